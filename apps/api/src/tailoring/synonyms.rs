//! Static domain synonym table used to loosen exact keyword matching.
//!
//! Built once on first use into an immutable map plus its reverse map.
//! Keys and terms are stored lowercase.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Head term → related terms. Curated per technical domain.
///
/// Matching is plain substring containment, so two-letter terms are left out
/// ("ml" would also hit "html").
#[rustfmt::skip]
const SYNONYMS: &[(&str, &[&str])] = &[
    // Compute / acceleration
    ("gpu", &["cuda", "parallel computing", "graphics processing", "gpgpu", "tensor cores"]),
    ("cuda", &["gpu programming", "nvidia", "cudnn"]),
    ("hpc", &["high performance computing", "supercomputing", "slurm", "message passing interface"]),
    ("parallel computing", &["multithreading", "concurrency", "openmp"]),
    // Languages
    ("python", &["django", "flask", "fastapi", "pandas", "numpy"]),
    ("javascript", &["node.js", "nodejs", "typescript", "ecmascript"]),
    ("typescript", &["angular", "deno"]),
    ("java", &["spring boot", "jvm", "kotlin"]),
    ("c++", &["cpp", "standard template library", "modern c++"]),
    ("rust", &["cargo", "tokio", "borrow checker"]),
    ("golang", &["goroutines"]),
    // ML / models
    ("machine learning", &["deep learning", "neural network", "scikit-learn", "model training"]),
    ("deep learning", &["neural network", "pytorch", "tensorflow", "keras"]),
    ("pytorch", &["torch", "torchvision"]),
    ("llm", &["large language model", "transformer", "gpt", "fine-tuning"]),
    ("nlp", &["natural language processing", "text mining", "tokenization"]),
    ("computer vision", &["image recognition", "object detection", "opencv"]),
    ("inference", &["model serving", "tensorrt", "onnx", "triton"]),
    // Optimization
    ("optimization", &["performance tuning", "profiling", "latency reduction", "throughput"]),
    ("performance", &["latency", "throughput", "benchmarking"]),
    // Infrastructure
    ("docker", &["container", "containerization", "dockerfile"]),
    ("kubernetes", &["k8s", "helm", "container orchestration", "openshift"]),
    ("aws", &["amazon web services", "ec2", "lambda", "cloudformation"]),
    ("azure", &["microsoft cloud", "aks"]),
    ("gcp", &["google cloud", "bigquery", "gke"]),
    ("cloud", &["aws", "azure", "google cloud", "saas"]),
    ("ci/cd", &["continuous integration", "continuous delivery", "github actions", "jenkins", "gitlab ci"]),
    ("devops", &["infrastructure as code", "terraform", "ansible", "site reliability"]),
    ("linux", &["unix", "bash", "shell scripting"]),
    // Data
    ("sql", &["postgresql", "mysql", "sqlite", "relational database"]),
    ("database", &["postgresql", "mongodb", "redis", "data modeling"]),
    ("big data", &["spark", "hadoop", "kafka", "data pipeline"]),
    // Practice
    ("agile", &["scrum", "kanban", "sprint"]),
    ("leadership", &["mentoring", "team lead", "managed a team", "coaching"]),
    ("testing", &["unit tests", "integration tests", "test automation", "pytest"]),
    ("api", &["rest", "graphql", "grpc", "endpoint"]),
    ("microservices", &["service-oriented", "distributed services", "event-driven"]),
];

/// Immutable forward + reverse synonym maps.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    forward: HashMap<String, Vec<String>>,
    /// term → head terms that list it as a synonym
    reverse: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    /// Builds a table from `(head, synonyms)` pairs. Everything is lowercased.
    pub fn from_pairs<'a, I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, S)>,
        S: IntoIterator<Item = &'a str>,
    {
        let mut forward: HashMap<String, Vec<String>> = HashMap::new();
        let mut reverse: HashMap<String, Vec<String>> = HashMap::new();

        for (head, terms) in pairs {
            let head = head.to_lowercase();
            for term in terms {
                let term = term.to_lowercase();
                reverse.entry(term.clone()).or_default().push(head.clone());
                forward.entry(head.clone()).or_default().push(term);
            }
        }

        Self { forward, reverse }
    }

    /// The built-in domain table, constructed once.
    pub fn builtin() -> &'static SynonymTable {
        static BUILTIN: OnceLock<SynonymTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            SynonymTable::from_pairs(SYNONYMS.iter().map(|(h, t)| (*h, t.iter().copied())))
        })
    }

    /// Synonyms listed under `keyword` (lowercase lookup).
    pub fn synonyms_of(&self, keyword: &str) -> &[String] {
        self.forward
            .get(&keyword.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Head terms that list `keyword` among their synonyms.
    pub fn heads_listing(&self, keyword: &str) -> &[String] {
        self.reverse
            .get(&keyword.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_gpu_synonyms() {
        let table = SynonymTable::builtin();
        let syns = table.synonyms_of("GPU");
        assert!(syns.iter().any(|s| s == "cuda"));
        assert!(syns.iter().any(|s| s == "parallel computing"));
    }

    #[test]
    fn test_reverse_map_points_back_to_heads() {
        let table = SynonymTable::builtin();
        let heads = table.heads_listing("cuda");
        assert!(heads.iter().any(|h| h == "gpu"), "cuda must map back to gpu");
    }

    #[test]
    fn test_unknown_keyword_has_no_synonyms() {
        let table = SynonymTable::builtin();
        assert!(table.synonyms_of("underwater basket weaving").is_empty());
        assert!(table.heads_listing("underwater basket weaving").is_empty());
    }

    #[test]
    fn test_from_pairs_lowercases() {
        let table = SynonymTable::from_pairs([("Foo", ["BAR", "Baz"])]);
        assert_eq!(table.synonyms_of("foo"), ["bar".to_string(), "baz".to_string()]);
        assert_eq!(table.heads_listing("BAZ"), ["foo".to_string()]);
    }

    #[test]
    fn test_builtin_avoids_python_and_gpu_as_synonyms() {
        // "python" and "gpu" are heads only; listing them as synonyms would make
        // ordinary bullets pick up transitive matches for unrelated keywords.
        let table = SynonymTable::builtin();
        assert!(table.heads_listing("python").is_empty());
        assert!(table.heads_listing("gpu").is_empty());
    }
}

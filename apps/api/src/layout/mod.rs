// Page fitting for tailored content.
// No real pagination happens here: budgets are fixed per section and the page count of
// rendered output is estimated from its byte size.

pub mod page_limit;
pub mod style;

pub use page_limit::{enforce, estimate_page_count, PageFit};
pub use style::DocumentStyle;

//! HTML format tests
//!
//! Export (markdown → HTML preview) and import (pasted HTML → rich document).

mod export;
mod import;

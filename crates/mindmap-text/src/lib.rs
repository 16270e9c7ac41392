//! Styled text for mind-map topics.
//!
//! Topic text is a plain string with a small inline markup vocabulary
//! (`<b>`, `<i>`, `<u>`, `<c:#RRGGBB>`, `<br/>`). This crate turns it into
//! styled runs and wraps those runs into lines no wider than a limit.
//!
//! Glyph measurement is delegated to the host through [`TextMeasurer`].
//!
//! # Example
//!
//! ```
//! use mindmap_text::{FontDescriptor, MonospaceMeasurer, TextWrapper};
//!
//! let measurer = MonospaceMeasurer::new(10.0, 16.0);
//! let wrapper = TextWrapper::new(&measurer);
//! let lines = wrapper.wrap("1234567890", &FontDescriptor::new("Arial", 10.0), 50.0);
//! assert_eq!(lines.len(), 2);
//! ```

mod markup;
mod metrics;
mod wrap;

pub use markup::{MarkupParser, StyledRun, DEFAULT_TEXT_COLOR};
pub use metrics::{ApproximateMeasurer, FontDescriptor, MonospaceMeasurer, StyleMetrics, TextExtent, TextMeasurer};
pub use wrap::{TextWrapper, WrappedLine};

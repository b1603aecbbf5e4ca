//! Rendered-output generation.
//!
//! One YAML check file per advisory, produced by substituting the extracted
//! fields into the advisory's bucket template:
//!
//! ```text
//! output_dir/
//! ├── C6/
//! │   └── CESA-2020:5009.yml
//! └── C7/
//!     └── CESA-2021:1234.yml
//! ```
//!
//! Files are written fresh each run; a re-harvested advisory overwrites its
//! previous file.

pub mod yaml;

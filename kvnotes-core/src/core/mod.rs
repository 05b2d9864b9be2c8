//! Internal domain modules for the kvnotes core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod backend;
pub mod error;
pub mod file_backend;
pub mod memory;
pub mod note;
pub mod session;
pub mod settings;
pub mod store;
pub mod summary;

#[doc(inline)]
pub use backend::KvBackend;
#[doc(inline)]
pub use error::{NotesError, Result};
#[doc(inline)]
pub use file_backend::FileBackend;
#[doc(inline)]
pub use memory::MemoryBackend;
#[doc(inline)]
pub use note::{Category, Note, NotesDocument};
#[doc(inline)]
pub use session::{Session, SessionCodec};
#[doc(inline)]
pub use settings::Settings;
#[doc(inline)]
pub use store::NotesStore;
#[doc(inline)]
pub use summary::{category_initials, NoteSummary};

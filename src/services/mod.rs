//! Raw Drive API endpoint services.

mod files;
mod permissions;

pub use files::FilesService;
pub use permissions::PermissionsService;

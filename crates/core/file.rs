use std::path::{Path, PathBuf};

use biborg::{
    file::{Access, FormatFile},
    format::{BibTex, Format},
};

use eyre::{Result, WrapErr};
use log::trace;

/// The file read when no path is given.
pub const DEFAULT_FILE_NAME: &str = "main.bib";

/// Open the bibliography at `path`, or `main.bib`, or the only `.bib` file in the current
/// directory, in that order of preference.
pub fn open_bibliography(path: Option<PathBuf>, access: Access) -> Result<FormatFile<BibTex>> {
    if let Some(path) = path {
        trace!("opening {} as a {} file", path.display(), BibTex::name());
        return FormatFile::open(&path, access).wrap_err("Cannot open the bibliography");
    }

    let default = Path::new(DEFAULT_FILE_NAME);
    if default.is_file() {
        trace!("'file' argument not used - opening {DEFAULT_FILE_NAME}");
        return FormatFile::open(default, access).wrap_err("Cannot open the bibliography");
    }

    trace!(
        "'file' argument not used and no {DEFAULT_FILE_NAME} - try and find any .{} files in current directory",
        BibTex::ext()
    );
    FormatFile::find(".", access)
        .wrap_err("No bibliography given - use the FILE argument to select one")
}

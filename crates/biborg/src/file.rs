//! Format supporting Filesystem operations.
//!
//! This module contains basic methods for opening format files and also provides types to read
//! and write from those format files.

use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, Write},
    marker::PhantomData,
    path::Path,
};

use crate::{
    format::{Format, Reader, Writer},
    Error, ErrorKind,
};

use glob::glob;

/// How a [`FormatFile`] is opened.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Access {
    /// Only read the file.
    Read,
    /// Read the file and allow overwriting it.
    ReadWrite,
}

/// A reference to an open file on the filesystem which should have the textual content that
/// matches the generic [`Format`].
///
/// `FormatFile`s are automatically closed when they go out of scope. Errors detected on closing are
/// ignored by the implementation of `Drop`.
#[allow(clippy::module_name_repetitions)]
pub struct FormatFile<F: Format> {
    file: File,
    _format: PhantomData<F>,
}

impl<F: Format> FormatFile<F> {
    fn new(file: File) -> Self {
        Self {
            file,
            _format: PhantomData,
        }
    }

    /// Attempts to open the format file at `path`.
    ///
    /// # Errors
    /// This function will return an error if `path` does not already exist or the user lacks
    /// permissions to open the file.
    ///
    /// # Examples
    /// ```no_run
    /// use biborg::{
    ///     file::{Access, FormatFile},
    ///     format::BibTex
    /// };
    ///
    /// fn main() -> Result<(), biborg::Error> {
    ///     let mut f = FormatFile::<BibTex>::open("main.bib", Access::Read)?;
    ///     Ok(())
    /// }
    ///
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, access: Access) -> Result<Self, Error> {
        open_file(path.as_ref(), access)
    }

    /// Attempts to find a single format file in the directory.
    ///
    /// This function will use the value from the [`Format::ext`] associated function to
    /// find a file with the same extension.
    ///
    /// # Errors
    /// This function will return an error if:
    /// - The path is not a directory
    /// - No file, or more than one file, can be found in the directory
    /// - User lacks permissions to open the file
    pub fn find<P: AsRef<Path>>(path: P, access: Access) -> Result<Self, Error> {
        find_format_file_in_directory(path, access)
    }
}

impl<F: Format> Reader for FormatFile<F> {
    type Format = F;

    fn read(&mut self) -> Result<Self::Format, Error> {
        read_file_to_string(&mut self.file).map(F::new)
    }
}

fn read_file_to_string(file: &mut File) -> Result<String, Error> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot read contents of file"))
        .map(move |bytes| {
            log::trace!("{bytes} bytes read from the file");
            content
        })
}

impl<F: Format> Writer for FormatFile<F> {
    type Format = F;

    fn write(&mut self, format: F) -> Result<(), Error> {
        fn overwrite_file_from_start(file: &mut File, bytes: &[u8]) -> std::io::Result<()> {
            // Rewind the cursor back to the start of the file to write over the contents and set
            // the length of the file to be equal to bytes so that existing data is removed
            log::trace!("rewind file cursor to start and write {} bytes", bytes.len());
            file.rewind()?;
            file.set_len(bytes.len() as u64)?;
            file.write_all(bytes)
        }

        let bytes = format.raw().into_bytes();
        overwrite_file_from_start(&mut self.file, &bytes)
            .map_err(|e| Error::wrap_with(ErrorKind::IO, e, "Cannot write format to file"))
    }
}

#[inline]
fn open_file<F: Format>(path: &Path, access: Access) -> Result<FormatFile<F>, Error> {
    OpenOptions::new()
        .read(true)
        .write(access == Access::ReadWrite)
        .open(path)
        .map(FormatFile::<F>::new)
        .map_err(|e| {
            let mode = match access {
                Access::Read => "reading",
                Access::ReadWrite => "reading and writing",
            };
            Error::wrap_with(
                ErrorKind::IO,
                e,
                format!("Failed to open the '{}' file for {mode}", path.display()),
            )
        })
}

fn find_format_file_in_directory<F, P>(dir: P, access: Access) -> Result<FormatFile<F>, Error>
where
    F: Format,
    P: AsRef<Path>,
{
    let path = dir.as_ref();
    if !path.is_dir() {
        return Err(Error::new(
            ErrorKind::IO,
            format!("{} is not a directory", path.display()),
        ));
    }

    let pattern = format!("{}/*.{}", glob::Pattern::escape(&path.to_string_lossy()), F::ext());

    let mut iter = glob(&pattern).map_err(|e| {
        Error::wrap_with(ErrorKind::IO, e, "Cannot search the directory for files")
    })?;

    let path_buf = iter
        .next()
        .ok_or_else(|| {
            Error::new(
                ErrorKind::IO,
                format!(
                    "No .{} file found in the '{}' directory",
                    F::ext(),
                    path.display()
                ),
            )
        })?
        .map_err(|e| {
            Error::wrap_with(
                ErrorKind::IO,
                e,
                "Cannot determine a file path - Do you have the correct permissions?",
            )
        })?;

    if iter.next().is_some() {
        return Err(Error::new(
            ErrorKind::IO,
            format!("More than one .{} file found", F::ext()),
        ));
    }

    log::debug!("Found {}", path_buf.display());
    open_file(path_buf.as_path(), access)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::format::BibTex;

    use assert_fs::{
        fixture::{FileTouch, FileWriteStr, PathChild},
        NamedTempFile, TempDir,
    };

    #[test]
    #[should_panic(expected = "Failed to open the 'file does not exist.bib' file for reading")]
    fn err_when_trying_to_open_bib_file_that_does_not_exist() {
        FormatFile::<BibTex>::open("file does not exist.bib", Access::Read).unwrap();
    }

    fn create_temp_file(name: &str, content: &str) -> NamedTempFile {
        let file = NamedTempFile::new(name).expect("Cannot create temp file for test");
        file.write_str(content)
            .expect("Failure on write to new temp file");
        file
    }

    #[test]
    fn read_temp_bib_file() {
        let file = create_temp_file("temp.bib", "@misc{a, k={1}}");
        let biblio = FormatFile::<BibTex>::open(file.path(), Access::Read)
            .and_then(|mut f| f.read_ast())
            .unwrap();
        file.close().unwrap();

        assert_eq!(biblio.entries()[0].cite, "a");
    }

    #[test]
    fn write_truncates_longer_content() {
        let file = create_temp_file("temp.bib", "@misc{b, k={1}, long={a much longer value}}");
        let mut f = FormatFile::<BibTex>::open(file.path(), Access::ReadWrite).unwrap();
        let mut biblio = f.read_ast().unwrap();
        biblio.entries_mut()[0].fields.truncate(1);
        f.write_ast(&biblio).unwrap();
        drop(f);

        let written = std::fs::read_to_string(file.path()).unwrap();
        file.close().unwrap();

        assert_eq!(written, "@misc{b,\n  k={1}\n}");
    }

    #[test]
    fn write_fails_on_read_only_access() {
        let file = create_temp_file("temp.bib", "@misc{a, k={1}}");
        let mut f = FormatFile::<BibTex>::open(file.path(), Access::Read).unwrap();
        let res = f.write(BibTex::new(String::new()));
        drop(f);
        file.close().unwrap();

        assert_eq!(res.unwrap_err().kind(), ErrorKind::IO);
    }

    #[test]
    #[should_panic(expected = "No .bib file found")]
    fn no_files_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");

        find_format_file_in_directory::<BibTex, _>(TempDir::path(&dir), Access::Read).unwrap();
    }

    #[test]
    #[should_panic(expected = "not a directory")]
    fn path_is_not_a_directory() {
        find_format_file_in_directory::<BibTex, _>("not a directory", Access::Read).unwrap();
    }

    #[test]
    #[should_panic(expected = "More than one .bib file")]
    fn multiple_bib_files_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        dir.child("one.bib").touch().unwrap();
        dir.child("two.bib").touch().unwrap();

        find_format_file_in_directory::<BibTex, _>(TempDir::path(&dir), Access::Read).unwrap();
    }

    #[test]
    fn find_single_bib_file_in_directory() {
        let dir = TempDir::new().expect("Cannot create temp directory for test");
        dir.child("refs.bib").write_str("@misc{a, k={1}}").unwrap();
        dir.child("notes.txt").touch().unwrap();

        let biblio = FormatFile::<BibTex>::find(dir.path(), Access::Read)
            .and_then(|mut f| f.read_ast())
            .unwrap();

        assert_eq!(biblio.len(), 1);
    }
}

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::as_conversions, clippy::mod_module_files)]

use std::{path::PathBuf, process};

mod file;

use biborg::{
    file::Access,
    format::{BibTex, Format, Json, Reader, Writer},
    SortOptions,
};

use clap::Parser;
use eyre::{eyre, Result, WrapErr};
use log::{debug, trace};

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        process::exit(2);
    }
}

fn try_main() -> Result<()> {
    let Cli {
        file,
        sort_fields,
        skip_sort_entries,
        in_place,
        json,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(verbosity as usize, quiet)?;

    if json && in_place {
        return Err(eyre!("--json cannot be used together with --in-place"));
    }

    let access = if in_place {
        Access::ReadWrite
    } else {
        Access::Read
    };
    let mut file = file::open_bibliography(file, access)?;
    let biblio = file.read_ast().wrap_err("Cannot parse the bibliography")?;

    let options = SortOptions {
        sort_entries: !skip_sort_entries,
        sort_fields,
    };
    let biblio = biborg::organise(biblio, options);
    debug!("{} entries organised", biblio.len());

    if json {
        println!("{}", Json::compose(&biblio).raw());
    } else if in_place {
        trace!("Updating the bibliography file..");
        let mut output = BibTex::compose(&biblio).raw();
        output.push('\n');
        file.write(BibTex::new(output))?;
        trace!("Done!");
    } else {
        println!("{}", BibTex::compose(&biblio).raw());
    }

    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> Result<()> {
    // if quiet then ignore verbosity but still show errors
    let verbosity = if quiet { 0 } else { verbosity + 1 };

    stderrlog::new()
        .verbosity(verbosity)
        .init()
        .wrap_err("Cannot set up logging")
}

#[derive(Parser)]
#[clap(name = "biborg")]
#[clap(about = "Sort and reformat a BibTeX bibliography into a canonical layout")]
#[clap(version)]
struct Cli {
    /// The bibliography file, defaults to `main.bib` or the only .bib file in the current
    /// directory
    #[clap(parse(from_os_str))]
    file: Option<PathBuf>,

    /// Sort the fields within each entry by name
    #[clap(short = 'f', long)]
    sort_fields: bool,

    /// Keep entries in their original order instead of sorting them by citation key
    #[clap(short = 'S', long)]
    skip_sort_entries: bool,

    /// Rewrite the file with the organised bibliography instead of printing it
    #[clap(short, long)]
    in_place: bool,

    /// Print the organised bibliography as JSON
    #[clap(long)]
    json: bool,

    /// How chatty the program is when performing commands
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only report errors, on stderr
    #[clap(short, long)]
    quiet: bool,
}

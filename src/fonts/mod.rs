//! Font loading for the two supported families.
//!
//! Each [`FontChoice`] is backed by four TrueType files (regular, bold, italic,
//! bold italic). The lookup walks an ordered list of `(file set, directory)`
//! sources and loads the first directory holding all four files:
//!
//! 1. `PDF_FLOW_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside this crate,
//!
//! all expecting the Liberation families (`LiberationSans-*.ttf` for arial,
//! `LiberationMono-*.ttf` for courier), which are metric compatible with the
//! fonts they stand in for, and finally
//!
//! 4. the Windows font directory (`PDF_FLOW_WINDOWS_FONTS_DIR`, then
//!    `%WINDIR%\Fonts`) with the Arial and Courier New files themselves.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

use crate::config::FontChoice;

/// Environment variable pointing at a directory with the bundled font files.
pub const FONTS_DIR_ENV: &str = "PDF_FLOW_FONTS_DIR";
/// Environment variable pointing at a directory with Windows system fonts.
pub const WINDOWS_FONTS_DIR_ENV: &str = "PDF_FLOW_WINDOWS_FONTS_DIR";

const STYLE_NAMES: [&str; 4] = ["regular", "bold", "italic", "bold italic"];
const BUNDLED_SUFFIXES: [&str; 4] = ["Regular", "Bold", "Italic", "BoldItalic"];

/// Windows file names per family, in [`STYLE_NAMES`] order.
const WINDOWS_FAMILIES: [(FontChoice, &str, [&str; 4]); 2] = [
    (
        FontChoice::Arial,
        "Arial",
        ["arial.ttf", "arialbd.ttf", "ariali.ttf", "arialbi.ttf"],
    ),
    (
        FontChoice::Courier,
        "Courier New",
        ["cour.ttf", "courbd.ttf", "couri.ttf", "courbi.ttf"],
    ),
];

/// Family name used to build the bundled file names, e.g. `LiberationMono-Bold.ttf`.
pub fn bundled_family_name(choice: FontChoice) -> &'static str {
    match choice {
        FontChoice::Arial => "LiberationSans",
        FontChoice::Courier => "LiberationMono",
    }
}

/// Location of the font directory shipped inside the crate.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

/// The four files making up one family.
#[derive(Clone, Debug, PartialEq, Eq)]
struct FamilyFiles {
    family: &'static str,
    files: [String; 4],
}

impl FamilyFiles {
    fn bundled(choice: FontChoice) -> Self {
        let family = bundled_family_name(choice);
        Self {
            family,
            files: BUNDLED_SUFFIXES.map(|suffix| format!("{family}-{suffix}.ttf")),
        }
    }

    fn windows(choice: FontChoice) -> Self {
        let (_, family, files) = WINDOWS_FAMILIES
            .iter()
            .find(|(candidate, _, _)| *candidate == choice)
            .copied()
            .unwrap_or(WINDOWS_FAMILIES[0]);
        Self {
            family,
            files: files.map(str::to_owned),
        }
    }

    fn missing_in(&self, directory: &Path) -> Vec<&str> {
        self.files
            .iter()
            .filter(|file| !directory.join(file).is_file())
            .map(String::as_str)
            .collect()
    }

    fn load(&self, directory: &Path) -> Result<FontFamily<FontData>, Error> {
        let load = |index: usize| {
            let path = directory.join(&self.files[index]);
            FontData::load(&path, None).map_err(|err| {
                Error::new(
                    format!(
                        "Failed to load {} {} font from {}: {}",
                        self.family,
                        STYLE_NAMES[index],
                        path.display(),
                        err
                    ),
                    io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
                )
            })
        };
        Ok(FontFamily {
            regular: load(0)?,
            bold: load(1)?,
            italic: load(2)?,
            bold_italic: load(3)?,
        })
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn bundled_directories() -> Vec<PathBuf> {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("assets/fonts")));

    let mut directories: Vec<PathBuf> = Vec::new();
    for candidate in [env_path(FONTS_DIR_ENV), exe_dir, Some(bundled_fonts_source_dir())]
        .into_iter()
        .flatten()
    {
        if !directories.contains(&candidate) {
            directories.push(candidate);
        }
    }
    directories
}

fn windows_font_directory() -> Option<PathBuf> {
    env_path(WINDOWS_FONTS_DIR_ENV).or_else(|| {
        if !cfg!(windows) {
            return None;
        }
        ["WINDIR", "SystemRoot"]
            .into_iter()
            .filter_map(env_path)
            .map(|root| root.join("Fonts"))
            .find(|directory| directory.is_dir())
    })
}

/// Every place the files for `choice` may live, in lookup order.
fn font_sources(choice: FontChoice) -> Vec<(FamilyFiles, PathBuf)> {
    let bundled = FamilyFiles::bundled(choice);
    let mut sources: Vec<_> = bundled_directories()
        .into_iter()
        .map(|directory| (bundled.clone(), directory))
        .collect();
    if let Some(directory) = windows_font_directory() {
        sources.push((FamilyFiles::windows(choice), directory));
    }
    sources
}

/// Picks the first source holding all four files, describing every rejected one.
fn first_complete(
    choice: FontChoice,
    sources: Vec<(FamilyFiles, PathBuf)>,
) -> Result<(FamilyFiles, PathBuf), Error> {
    let mut rejected = Vec::new();
    for (files, directory) in sources {
        if !directory.is_dir() {
            rejected.push(format!("{} (directory missing)", directory.display()));
            continue;
        }
        let missing = files.missing_in(&directory);
        if missing.is_empty() {
            return Ok((files, directory));
        }
        rejected.push(format!(
            "{} (missing [{}])",
            directory.display(),
            missing.join(", ")
        ));
    }

    let checked = if rejected.is_empty() {
        "no search paths were available".to_owned()
    } else {
        rejected.join(", ")
    };
    Err(Error::new(
        format!(
            "Unable to locate {} font files. Checked: {}. Set {} to a directory containing them.",
            bundled_family_name(choice),
            checked,
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font files not found"),
    ))
}

/// Loads the font family backing `choice` from the first complete source.
pub fn font_family(choice: FontChoice) -> Result<FontFamily<FontData>, Error> {
    let (files, directory) = first_complete(choice, font_sources(choice))?;
    if files.family != bundled_family_name(choice) {
        warn!(
            "{} fonts not found; falling back to Windows '{}' in {}",
            bundled_family_name(choice),
            files.family,
            directory.display()
        );
    }
    debug!("loading {} from {}", files.family, directory.display());
    files.load(&directory)
}

/// Indicates whether the font files for `choice` can be found in one of the search directories.
pub fn fonts_available(choice: FontChoice) -> bool {
    first_complete(choice, font_sources(choice)).is_ok()
}

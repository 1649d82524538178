use anyhow::{Context, Result};
use ignore::WalkBuilder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

use crate::classfile::{ClassHeader, parse_header};

/// Lists every `.class` file under `classes_dir` in sorted path order. A
/// missing directory yields an empty list.
pub fn class_files(classes_dir: &Path) -> Result<Vec<PathBuf>> {
    if !classes_dir.is_dir() {
        return Ok(Vec::new());
    }

    let walker = WalkBuilder::new(classes_dir)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .sort_by_file_path(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file())
            && path.extension().is_some_and(|e| e == "class")
        {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Parses the header of a single class file on disk.
pub fn class_file_header(path: &Path) -> Result<Option<ClassHeader>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read class file: {}", path.display()))?;
    parse_header(&bytes).with_context(|| format!("malformed class file: {}", path.display()))
}

/// Collects the headers of all public classes in a jar, in archive entry
/// order. Entries not ending in `.class` are skipped; an unreadable jar or an
/// unparseable class entry aborts the scan.
pub fn jar_class_headers(jar_path: &Path) -> Result<Vec<ClassHeader>> {
    let file =
        File::open(jar_path).with_context(|| format!("failed to open jar: {}", jar_path.display()))?;
    // SAFETY: The file is opened read-only and remains valid for the lifetime of the mmap.
    // The mmap is dropped before the file, ensuring memory safety.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("failed to mmap jar: {}", jar_path.display()))?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("failed to read zip structure: {}", jar_path.display()))?;

    let mut headers = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if !entry.name().ends_with(".class") {
            continue;
        }
        let entry_name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes).with_context(|| {
            format!("failed to read entry {entry_name} in {}", jar_path.display())
        })?;
        let header = parse_header(&bytes).with_context(|| {
            format!("malformed class {entry_name} in {}", jar_path.display())
        })?;
        if let Some(header) = header {
            headers.push(header);
        }
    }
    Ok(headers)
}

use std::io::{self, Read, Seek, Write};

use cpsed_class_file::{Mode, Transcoder};
use log::debug;
use zip::{read::ZipFile, write::FileOptions, ZipArchive, ZipWriter};

use crate::{JarError, Result};

/// Path prefix of the manifest and signature files.
const METADATA_PREFIX: &str = "META-INF";

const CLASS_FILE_SUFFIX: &str = ".class";

#[derive(Debug, Default, Clone, Copy)]
pub struct JarOptions {
    skip_metadata: bool,
}
impl JarOptions {
    /// Leaves members under `META-INF` out entirely: they are neither listed nor copied, which
    /// also drops signatures a rewrite would invalidate.
    pub fn skip_metadata(mut self, skip_metadata: bool) -> Self {
        self.skip_metadata = skip_metadata;
        self
    }

    fn skips(&self, name: &str) -> bool {
        self.skip_metadata && name.starts_with(METADATA_PREFIX)
    }
}

/// Feeds the class members of an archive through one [`Transcoder`], in archive order.
pub struct Walker {
    transcoder: Transcoder,
    options: JarOptions,
}
impl Walker {
    pub fn new(mode: Mode, options: JarOptions) -> Self {
        Self {
            transcoder: Transcoder::new(mode),
            options,
        }
    }

    /// Writes the report of every class member to `diagnostics` without producing an archive.
    pub fn list<R: Read + Seek>(&mut self, input: R, mut diagnostics: impl Write) -> Result<()> {
        let mut archive = ZipArchive::new(input)?;
        debug!("{} members", archive.len());

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            let name = file.name().to_owned();
            if file.is_dir() || self.options.skips(&name) || !is_class_file(&name) {
                continue;
            }

            let report = self
                .transcoder
                .transcode(&name, file, None::<io::Sink>)
                .map_err(|source| JarError::Member { name, source })?;
            write!(diagnostics, "{}", report)?;
        }

        diagnostics.flush()?;
        Ok(())
    }

    /// Writes a new archive to `output` in which every class member has gone through the
    /// transcoder. Everything else is copied without being decompressed.
    pub fn rewrite<R: Read + Seek, W: Write + Seek>(
        &mut self,
        input: R,
        output: W,
        mut diagnostics: impl Write,
    ) -> Result<W> {
        let mut archive = ZipArchive::new(input)?;
        let mut writer = ZipWriter::new(output);
        debug!("{} members", archive.len());

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let name = file.name().to_owned();
            if self.options.skips(&name) {
                debug!("{}: skipped", name);
                continue;
            }

            if file.is_dir() || !is_class_file(&name) {
                debug!("{}: copied", name);
                writer.raw_copy_file(file)?;
                continue;
            }

            let options = file_options(&file);
            drop(file);

            writer.start_file(name.as_str(), options)?;
            let report = self
                .transcoder
                .transcode(&name, archive.by_index(i)?, Some(&mut writer))
                .map_err(|source| JarError::Member {
                    name: name.clone(),
                    source,
                })?;
            write!(diagnostics, "{}", report)?;
        }

        diagnostics.flush()?;
        Ok(writer.finish()?)
    }
}

fn is_class_file(name: &str) -> bool {
    name.ends_with(CLASS_FILE_SUFFIX)
}

fn file_options(file: &ZipFile) -> FileOptions {
    let options = FileOptions::default()
        .compression_method(file.compression())
        .last_modified_time(file.last_modified());

    match file.unix_mode() {
        Some(mode) => options.unix_permissions(mode),
        None => options,
    }
}

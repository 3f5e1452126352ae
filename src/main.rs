use std::{
    fs::{self, File},
    io::{self, Cursor, Read, Seek, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::Parser;
use cpsed_class_file::Mode;
use cpsed_jar::{JarOptions, Walker};
use memmap::Mmap;

/// Lists or rewrites the UTF-8 constants of the classes in a JAR
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input JAR
    jar_in: PathBuf,

    /// Regular expression selecting constant pool strings
    pattern: Option<String>,

    /// Literal text replacing every match; without an output JAR only the changes are listed
    replacement: Option<String>,

    /// Output JAR, must not be the input JAR
    jar_out: Option<PathBuf>,

    /// Leave META-INF out of both the listing and the output JAR
    #[arg(long)]
    skip_meta_inf: bool,
}
impl Args {
    fn mode(&self) -> anyhow::Result<Mode> {
        let mode = match (&self.pattern, &self.replacement) {
            (None, _) => Mode::scan(),
            (Some(pattern), None) => Mode::filter(pattern)?,
            (Some(pattern), Some(replacement)) => Mode::rewrite(pattern, replacement.as_str())?,
        };

        Ok(mode)
    }
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    run(Args::parse(), io::stdout().lock())
}

fn run(args: Args, diagnostics: impl Write) -> anyhow::Result<()> {
    let mut walker = Walker::new(
        args.mode()?,
        JarOptions::default().skip_metadata(args.skip_meta_inf),
    );

    // Creating the output truncates it, which must never happen to the mapped input
    if let Some(jar_out) = &args.jar_out {
        ensure_distinct(&args.jar_in, jar_out)?;
    }

    let file = File::open(&args.jar_in)
        .with_context(|| format!("Failed to open {}", args.jar_in.display()))?;
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to map {}", args.jar_in.display()))?;
    let input = Cursor::new(&mmap[..]);

    match &args.jar_out {
        None => walker
            .list(input, diagnostics)
            .with_context(|| format!("Failed to read {}", args.jar_in.display())),
        Some(jar_out) => rewrite_jar(&mut walker, input, jar_out, diagnostics)
            .with_context(|| format!("Failed to rewrite {}", args.jar_in.display())),
    }
}

fn ensure_distinct(jar_in: &Path, jar_out: &Path) -> anyhow::Result<()> {
    if !jar_out.exists() {
        return Ok(());
    }

    let canonical_in = fs::canonicalize(jar_in)
        .with_context(|| format!("Failed to resolve {}", jar_in.display()))?;
    let canonical_out = fs::canonicalize(jar_out)
        .with_context(|| format!("Failed to resolve {}", jar_out.display()))?;
    if canonical_in == canonical_out {
        bail!(
            "{} is both the input and the output JAR",
            canonical_in.display()
        );
    }

    Ok(())
}

/// Writes the rewritten archive to `jar_out`, removing it again if the rewrite fails.
fn rewrite_jar<R: Read + Seek>(
    walker: &mut Walker,
    input: R,
    jar_out: &Path,
    diagnostics: impl Write,
) -> anyhow::Result<()> {
    let output = File::create(jar_out)
        .with_context(|| format!("Failed to create {}", jar_out.display()))?;

    if let Err(e) = walker.rewrite(input, output, diagnostics) {
        if let Err(remove_error) = fs::remove_file(jar_out) {
            log::warn!("Failed to remove {}: {}", jar_out.display(), remove_error);
        }
        return Err(e.into());
    }

    Ok(())
}

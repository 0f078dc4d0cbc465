// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use anyhow::Context;
use clap::{Parser, Subcommand};
use l5x::{Document, Element, LogixType, RadixCodec, Serializer, SerializerConfig, TypeClass, TypeRegistry};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "l5x-inspect")]
#[command(about = "Inspect and re-encode L5X controller exports")]
#[command(version)]
struct Cli {
    /// Log codec decisions (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every data type the file defines or implies
    Types {
        /// Input L5X file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Show members, hidden backing members included
        #[arg(short, long)]
        members: bool,
    },

    /// Decode every controller tag
    Tags {
        /// Input L5X file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the decoded value tree of one tag
    Show {
        /// Input L5X file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Tag name
        tag: String,
    },

    /// Decode, re-encode and compare every tag
    Roundtrip {
        /// Input L5X file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the re-encoded document here
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Accept out-of-order array indices
        #[arg(long)]
        relaxed: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Types { input, members } => cmd_types(&input, members),
        Commands::Tags { input } => cmd_tags(&input),
        Commands::Show { input, tag } => cmd_show(&input, &tag),
        Commands::Roundtrip {
            input,
            output,
            relaxed,
        } => cmd_roundtrip(&input, output.as_deref(), relaxed),
    }
}

fn load(input: &Path) -> anyhow::Result<Document> {
    let xml = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let doc = Document::parse(&xml).with_context(|| format!("parsing {}", input.display()))?;
    if doc.controller().is_none() {
        anyhow::bail!("{} has no Controller element", input.display());
    }
    Ok(doc)
}

fn cmd_types(input: &Path, members: bool) -> anyhow::Result<()> {
    let doc = load(input)?;
    let registry = TypeRegistry::from_document(&doc);
    let defs = registry.resolve_all()?;

    println!("[OK] {} types in {}", defs.len(), input.display());
    for def in &defs {
        println!(
            "  {} ({}, {} members)",
            def.name,
            def.class.token(),
            def.public_members().count()
        );
        if !members {
            continue;
        }
        for m in &def.members {
            let mut line = format!("      {} : {}", m.name, m.data_type);
            if m.dimension > 0 {
                let _ = write!(line, "[{}]", m.dimension);
            }
            let _ = write!(line, " {}", m.radix);
            if m.hidden {
                line.push_str(" (hidden)");
            }
            if let (Some(target), Some(bit)) = (&m.target, m.bit_number) {
                let _ = write!(line, " -> {target}.{bit}");
            }
            println!("{line}");
        }
    }

    let stats = registry.stats();
    tracing::debug!(
        "registry: {} hits, {} misses, {} builds",
        stats.hits,
        stats.misses,
        stats.builds
    );
    Ok(())
}

fn cmd_tags(input: &Path) -> anyhow::Result<()> {
    let doc = load(input)?;
    let registry = TypeRegistry::from_document(&doc);
    let serializer = Serializer::new(&registry);

    let mut failures = 0usize;
    let mut count = 0usize;
    for tag in doc.tags() {
        count += 1;
        match serializer.decode_tag(tag) {
            Ok((name, value)) => println!("  {name} : {}", describe(&value)),
            Err(e) => {
                failures += 1;
                eprintln!(
                    "  [ERROR] {}: {e}",
                    tag.attribute("Name").unwrap_or("<unnamed>")
                );
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {count} tags failed to decode");
    }
    println!("[OK] {count} tags decoded from {}", input.display());
    Ok(())
}

fn cmd_show(input: &Path, tag_name: &str) -> anyhow::Result<()> {
    let doc = load(input)?;
    let registry = TypeRegistry::from_document(&doc);
    let serializer = Serializer::new(&registry);

    let tag = doc
        .tags()
        .find(|t| {
            t.attribute("Name")
                .is_some_and(|n| n.eq_ignore_ascii_case(tag_name))
        })
        .with_context(|| format!("no tag named {tag_name}"))?;
    let (name, value) = serializer.decode_tag(tag)?;

    let mut out = String::new();
    render(&mut out, &name, &value, 0)?;
    print!("{out}");
    Ok(())
}

fn cmd_roundtrip(input: &Path, output: Option<&Path>, relaxed: bool) -> anyhow::Result<()> {
    let doc = load(input)?;
    let registry = TypeRegistry::from_document(&doc);
    let config = SerializerConfig::builder()
        .strict_array_indices(!relaxed)
        .build();
    let serializer = Serializer::with_config(&registry, config);

    let mut tags = Element::new("Tags");
    let mut mismatches = 0usize;
    for tag in doc.tags() {
        let (name, value) = serializer.decode_tag(tag)?;
        let encoded = serializer.encode_tag(&name, &value)?;
        let (_, again) = serializer.decode_tag(&encoded)?;
        if again != value {
            mismatches += 1;
            eprintln!("  [ERROR] {name}: value changed across re-encoding");
        }
        tags.push(encoded);
    }
    if mismatches > 0 {
        anyhow::bail!("{mismatches} tags did not survive a round trip");
    }
    println!("[OK] {} tags round-trip", tags.children().len());

    if let Some(path) = output {
        let mut data_types = Element::new("DataTypes");
        for def in registry.resolve_all()? {
            if def.class != TypeClass::Predefined {
                data_types.push(def.to_element());
            }
        }
        let controller_name = doc
            .controller()
            .and_then(|c| c.attribute("Name"))
            .unwrap_or("Controller");
        let root = Element::new("RSLogix5000Content").with_child(
            Element::new("Controller")
                .with_attribute("Name", controller_name)
                .with_child(data_types)
                .with_child(tags),
        );
        std::fs::write(
            path,
            Document::from_root(root).to_xml(serializer.config().indent),
        )
        .with_context(|| format!("writing {}", path.display()))?;
        println!("[OK] Wrote {}", path.display());
    }
    Ok(())
}

/// One-line summary: `DINT[3]`, `MOTOR`, `BOOL = 1`.
fn describe(value: &LogixType) -> String {
    match value {
        LogixType::Atomic(v) => match RadixCodec::format_value(v) {
            Ok(text) => format!("{} = {text}", v.kind().name()),
            Err(_) => v.kind().name().to_string(),
        },
        LogixType::Structure(s) => s.name.clone(),
        LogixType::Array(a) => format!("{}[{}]", a.element_type(), a.dimensions()),
        LogixType::Undefined { name } => format!("{name} (undefined)"),
    }
}

fn render(out: &mut String, label: &str, value: &LogixType, depth: usize) -> anyhow::Result<()> {
    let pad = "  ".repeat(depth);
    writeln!(out, "{pad}{label} : {}", describe(value))?;
    match value {
        LogixType::Structure(s) => {
            for member in s.members() {
                render(out, &member.name, &member.value, depth + 1)?;
            }
        }
        LogixType::Array(a) => {
            for (i, element) in a.elements().iter().enumerate() {
                render(out, &a.dimensions().label(i), element, depth + 1)?;
            }
        }
        LogixType::Atomic(_) | LogixType::Undefined { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../crates/l5x/tests/fixtures/sample.l5x"
    );

    #[test]
    fn roundtrip_writes_a_readable_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("out.l5x");
        cmd_roundtrip(Path::new(SAMPLE), Some(&out), false).expect("roundtrip");

        let doc = load(&out).expect("reload");
        assert_eq!(doc.tags().count(), load(Path::new(SAMPLE)).expect("sample").tags().count());
        cmd_tags(&out).expect("tags decode");
    }

    #[test]
    fn missing_controller_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.l5x");
        std::fs::write(&path, "<RSLogix5000Content/>").expect("write");
        assert!(load(&path).is_err());
    }

    #[test]
    fn render_lists_members() {
        let registry = TypeRegistry::new();
        let value = registry.instantiate("TIMER").expect("TIMER");
        let mut out = String::new();
        render(&mut out, "T1", &value, 0).expect("render");
        assert!(out.starts_with("T1 : TIMER\n"));
        assert!(out.contains("  PRE : DINT = 0\n"));
        assert!(out.contains("  DN : BOOL = 0\n"));
    }
}

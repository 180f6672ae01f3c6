//! SVG regression tests for the demo scenes
//!
//! Every `.toml` scene under `demos/` must render, and rendering must be
//! byte-for-byte deterministic.

use std::fs;
use std::path::Path;

use vector_scene::{render, render_with_config, RenderConfig, SvgConfig};

fn demo_sources() -> Vec<(String, String)> {
    let demos_dir = Path::new("demos");
    assert!(demos_dir.exists(), "Demos directory not found at {:?}", demos_dir);

    let mut sources: Vec<_> = fs::read_dir(demos_dir)
        .expect("Failed to read demos directory")
        .map(|entry| entry.expect("Failed to read entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
        .map(|path| {
            let source = fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
            (path.display().to_string(), source)
        })
        .collect();
    sources.sort();
    sources
}

#[test]
fn test_svg_regression_all_demos() {
    let mut tested = 0;
    let mut failures = Vec::new();

    for (name, source) in demo_sources() {
        match render(&source) {
            Ok(svg) => {
                if !svg.contains("<svg xmlns=\"http://www.w3.org/2000/svg\"") {
                    failures.push(format!("Invalid SVG in {}: missing <svg> tag", name));
                }
                if !svg.ends_with("</svg>") {
                    failures.push(format!("Invalid SVG in {}: missing </svg> tag", name));
                }
                if !svg.contains("viewBox=") {
                    failures.push(format!("No viewBox derived for {}", name));
                }
                tested += 1;
            }
            Err(e) => {
                failures.push(format!("Failed to render {}: {:?}", name, e));
            }
        }
    }

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("  - {}", failure);
        }
        panic!("{} rendering test(s) failed. See output above.", failures.len());
    }

    assert!(tested > 0, "No .toml files found in demos directory");
}

#[test]
fn test_rendering_is_deterministic() {
    for (name, source) in demo_sources() {
        let first = render(&source).unwrap();
        let second = render(&source).unwrap();
        assert_eq!(first, second, "{} rendered differently twice", name);
    }
}

#[test]
fn test_pretty_output_only_changes_whitespace() {
    let pretty = RenderConfig::new().with_svg(SvgConfig::new().with_pretty_print(true));
    for (name, source) in demo_sources() {
        let flat = render(&source).unwrap();
        let indented = render_with_config(&source, pretty.clone()).unwrap();
        let strip = |s: &str| s.lines().map(str::trim_start).collect::<Vec<_>>().join("\n");
        assert_eq!(strip(&flat), strip(&indented), "{}", name);
    }
}

#[test]
fn test_nested_groups_demo() {
    let source = fs::read_to_string("demos/nested_groups.toml").unwrap();
    let svg = render(&source).unwrap();
    insta::assert_snapshot!(svg, @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <svg xmlns="http://www.w3.org/2000/svg" viewBox="30 20 70 30">
    <g class="outer">
    <circle cx="40" cy="40" r="10" style="fill: #ff9800;"/>
    <g class="inner">
    <rect x="80" y="20" width="20" height="20" transform="rotate(45, 5, 5)"/>
    <line x1="80" y1="50" x2="100" y2="50" style="stroke: #333333; stroke-width: 1;"/>
    </g>
    </g>
    </svg>
    "###);
}

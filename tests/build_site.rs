//! End-to-end pipeline tests over `fixtures/site`.
//!
//! The fixture export holds five en-US articles (one secret) and three it-IT
//! articles (one without a slug), with `page_length = 2`.

use polyblog::{load, pages, render};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use walkdir::WalkDir;

fn fixture_site() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/site")
}

fn build(out: &Path) -> render::RenderSummary {
    let content = load::load(&fixture_site()).unwrap();
    let manifest = pages::plan(&content);
    render::render(&manifest, &fixture_site(), out).unwrap()
}

fn read(out: &Path, rel: &str) -> String {
    fs::read_to_string(out.join(rel)).unwrap_or_else(|e| panic!("missing {rel}: {e}"))
}

#[test]
fn renders_every_locale_page() {
    let tmp = TempDir::new().unwrap();
    let summary = build(tmp.path());

    assert_eq!(summary.listing_pages, 5);
    assert_eq!(summary.article_pages, 8);
    assert_eq!(summary.static_files, 1);

    let expected = [
        "index.html",
        "page/2/index.html",
        "page/3/index.html",
        "draft-macro-hygiene/index.html",
        "error-handling-patterns/index.html",
        "async-in-practice/index.html",
        "ownership-without-tears/index.html",
        "zero-cost-abstractions/index.html",
        "it/index.html",
        "it/page/2/index.html",
        "it/gestione-degli-errori-perche-e-cosi/index.html",
        "it/ownership-senza-lacrime/index.html",
        "it/astrazioni-a-costo-zero/index.html",
        "robots.txt",
    ];
    for rel in expected {
        assert!(tmp.path().join(rel).exists(), "missing {rel}");
    }

    let html_files = WalkDir::new(tmp.path())
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_name() == "index.html")
        .count();
    assert_eq!(html_files, 13);
}

#[test]
fn listings_are_newest_first() {
    let tmp = TempDir::new().unwrap();
    build(tmp.path());

    let first = read(tmp.path(), "index.html");
    let draft = first.find(r#"href="/draft-macro-hygiene""#).unwrap();
    let errors = first.find(r#"href="/error-handling-patterns""#).unwrap();
    assert!(draft < errors);
    assert!(!first.contains(r#"href="/async-in-practice""#));

    let last = read(tmp.path(), "page/3/index.html");
    assert!(last.contains(r#"href="/zero-cost-abstractions""#));
    assert!(last.contains(r#"rel="prev" href="/page/2""#));
    assert!(!last.contains(r#"rel="next""#));
}

#[test]
fn italian_pages_live_under_prefix() {
    let tmp = TempDir::new().unwrap();
    build(tmp.path());

    let listing = read(tmp.path(), "it/index.html");
    assert!(listing.contains(r#"<html lang="it-it">"#));
    assert!(listing.contains(r#"href="/it/gestione-degli-errori-perche-e-cosi""#));
    assert!(listing.contains(r#"rel="next" href="/it/page/2""#));

    let article = read(tmp.path(), "it/ownership-senza-lacrime/index.html");
    assert!(article.contains(
        r#"<link rel="canonical" href="https://blog.example.com/it/ownership-senza-lacrime">"#
    ));
    assert!(article.contains(r#"href="/it/astrazioni-a-costo-zero""#));
}

#[test]
fn secret_article_rendered_but_not_indexed() {
    let tmp = TempDir::new().unwrap();
    build(tmp.path());

    let draft = read(tmp.path(), "draft-macro-hygiene/index.html");
    assert!(draft.contains(r#"<meta name="robots" content="noindex">"#));

    let public = read(tmp.path(), "async-in-practice/index.html");
    assert!(!public.contains("noindex"));
}

#[test]
fn cli_build_writes_manifests_and_site() {
    let tmp = TempDir::new().unwrap();
    let out = tmp.path().join("dist");
    let temp_dir = tmp.path().join("temp");

    let status = Command::new(env!("CARGO_BIN_EXE_polyblog"))
        .arg("build")
        .arg("--site")
        .arg(fixture_site())
        .arg("--output")
        .arg(&out)
        .arg("--temp-dir")
        .arg(&temp_dir)
        .status()
        .expect("failed to run polyblog");
    assert!(status.success());

    assert!(temp_dir.join("articles.json").exists());
    assert!(temp_dir.join("pages.json").exists());
    assert!(out.join("index.html").exists());
    assert!(out.join("it/page/2/index.html").exists());
}

#[test]
fn cli_check_rejects_invalid_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "page_length = 0\n").unwrap();
    fs::copy(
        fixture_site().join("content.json"),
        tmp.path().join("content.json"),
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_polyblog"))
        .arg("check")
        .arg("--site")
        .arg(tmp.path())
        .output()
        .expect("failed to run polyblog");
    assert!(!output.status.success());
}

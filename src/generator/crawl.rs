// src/generator/crawl.rs
// =============================================================================
// This module implements the depth-first crawl of the ECoS help system.
//
// How it works:
// 1. Ask for help() and write index.html
// 2. Every "help(topic)" in that text becomes a generic topic page
// 3. Every name listed under "Implemented objectclasses:" becomes an
//    object class page
// 4. Each object class page asks for help(class,command) for every command
//    and turns the listed options into attribute pages
//
// A page is only written after all the pages it links to have been written.
// Each builder returns the <a> tag the caller splices into its own text.
//
// Rust concepts:
// - Generics: HelpGenerator<S> works with any HelpSource
// - async/await: every request is awaited before the next one is sent
// - HashMap: remembers pages already written during this run
// =============================================================================

use super::nav::Breadcrumb;
use super::page::{page_filename, write_page, PageRecord, INDEX_FILENAME};
use super::splice::{find_references, splice, Reference};
use crate::ecos::{HelpSource, ProtocolError};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;
use std::sync::OnceLock;

// Commands an object class may support, in page order
pub const COMMANDS: [&str; 9] = [
    "get",
    "set",
    "create",
    "delete",
    "request",
    "release",
    "link",
    "unlink",
    "queryObjects",
];

const CLASSES_MARKER: &str = "Implemented objectclasses:";

// Links "Manager: 10 (lok-manager)" to the manager's own class page
const MANAGER_LINK: &str = r#"${1}<a href="${2}.html">${2}</a>${3}"#;

// The kinds of page we build. Part of the "already built" key because a
// topic and an object class can share a filename but not a link label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PageKind {
    Topic,
    ObjectClass,
    Attribute,
}

pub struct HelpGenerator<S> {
    source: S,
    output_dir: PathBuf,
    // (kind, filename) -> link returned the first time
    built: HashMap<(PageKind, String), String>,
    pages: Vec<PageRecord>,
}

impl<S: HelpSource> HelpGenerator<S> {
    pub fn new(source: S, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            built: HashMap::new(),
            pages: Vec::new(),
        }
    }

    // Pages written so far, in the order they were written
    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    // Builds the whole documentation set, starting at index.html
    pub async fn build(&mut self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;

        let nav = Breadcrumb::root();
        let txt = self
            .source
            .request("help()")
            .await?
            .ok_or_else(|| missing_marker("help()", CLASSES_MARKER))?;

        // generic topics
        let mut replacements = Vec::new();
        for Reference { span, name } in find_references(topic_pattern(), &txt) {
            let link = self.build_generic_help(&name, &nav).await?;
            replacements.push((span, link));
        }
        let txt = splice(&txt, &replacements);

        // object classes, listed after the marker
        let offset = txt
            .find(CLASSES_MARKER)
            .ok_or_else(|| missing_marker("help()", CLASSES_MARKER))?;
        let (head, tail) = txt.split_at(offset);

        let mut replacements = Vec::new();
        for Reference { span, name } in find_references(class_pattern(), tail) {
            let link = self.build_object_class_help(&name, &nav).await?;
            replacements.push((span, link));
        }
        let txt = format!("{}{}", head, splice(tail, &replacements));

        self.write(INDEX_FILENAME, "Index", &txt, &Breadcrumb::empty())
    }

    async fn build_generic_help(&mut self, topic: &str, nav: &Breadcrumb) -> Result<String> {
        let filename = page_filename(&[topic]);
        if let Some(link) = self.already_built(PageKind::Topic, &filename) {
            return Ok(link);
        }

        let txt = self
            .source
            .request(&format!("help({})", topic))
            .await?
            .unwrap_or_default();
        self.write(&filename, &capitalize(topic), &txt, &nav.with(topic, &filename))?;

        let link = format!(r#"<a href="{}">help({})</a>"#, filename, topic);
        Ok(self.remember(PageKind::Topic, filename, link))
    }

    async fn build_object_class_help(&mut self, object_class: &str, nav: &Breadcrumb) -> Result<String> {
        let filename = page_filename(&[object_class]);
        if let Some(link) = self.already_built(PageKind::ObjectClass, &filename) {
            return Ok(link);
        }
        let class_nav = nav.with(object_class, &filename);

        // header
        let header = self
            .source
            .request(&format!("help({})", object_class))
            .await?
            .unwrap_or_default();
        let mut txt = manager_pattern().replace_all(&header, MANAGER_LINK).into_owned();

        // commands
        for command in COMMANDS {
            let request = format!("help({},{})", object_class, command);
            let Some(response) = self.source.request(&request).await? else {
                continue;
            };

            let marker = format!("Options for {} command:", command);
            let offset = response
                .find(&marker)
                .ok_or_else(|| missing_marker(&request, &marker))?;
            let options = &response[offset..];

            let mut replacements: Vec<(Range<usize>, String)> = Vec::new();
            for Reference { span, name } in find_references(attribute_pattern(), options) {
                let link = self
                    .build_object_command_help(object_class, command, &name, &class_nav)
                    .await?;
                replacements.push((span, link));
            }

            txt.push('\n');
            txt.push_str(&format!(r#"<a id="{}"></a>"#, command));
            txt.push_str(&splice(options, &replacements));
        }

        self.write(&filename, object_class, &txt, &class_nav)?;

        let link = format!(r#"<a href="{}">{}</a>"#, filename, object_class);
        Ok(self.remember(PageKind::ObjectClass, filename, link))
    }

    async fn build_object_command_help(
        &mut self,
        object_class: &str,
        command: &str,
        attribute: &str,
        nav: &Breadcrumb,
    ) -> Result<String> {
        let filename = page_filename(&[object_class, command, attribute]);
        if let Some(link) = self.already_built(PageKind::Attribute, &filename) {
            return Ok(link);
        }

        let txt = self
            .source
            .request(&format!("help({},{},{})", object_class, command, attribute))
            .await?
            .unwrap_or_default();

        let command_anchor = format!("{}#{}", page_filename(&[object_class]), command);
        let attribute_nav = nav.with(command, command_anchor).with(attribute, &filename);
        let title = format!("{} :: {} :: {}", object_class, command, attribute);
        self.write(&filename, &title, &txt, &attribute_nav)?;

        let link = format!(r#"<a href="{}">{}</a>"#, filename, attribute);
        Ok(self.remember(PageKind::Attribute, filename, link))
    }

    fn write(&mut self, filename: &str, title: &str, text: &str, nav: &Breadcrumb) -> Result<()> {
        write_page(&self.output_dir, filename, title, text, nav)?;
        self.pages.push(PageRecord {
            filename: filename.to_string(),
            title: title.to_string(),
        });
        Ok(())
    }

    fn already_built(&self, kind: PageKind, filename: &str) -> Option<String> {
        self.built.get(&(kind, filename.to_string())).cloned()
    }

    fn remember(&mut self, kind: PageKind, filename: String, link: String) -> String {
        self.built.insert((kind, filename), link.clone());
        link
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }
}

fn missing_marker(command: &str, marker: &str) -> anyhow::Error {
    ProtocolError::MissingMarker {
        command: command.to_string(),
        marker: marker.to_string(),
    }
    .into()
}

// "syntax" -> "Syntax"
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn topic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"help\((?P<name>[a-z]+)\)").expect("topic pattern is valid"))
}

fn class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^(?P<indent>\s+)(?P<name>[a-z-]+)\b").expect("class pattern is valid")
    })
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?m)^(?P<indent>\s{4})(?P<name>[a-z0-9-]+)\b").expect("attribute pattern is valid")
    })
}

fn manager_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(Manager: \d+ \()([a-z-]+)(\))").expect("manager pattern is valid"))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why collect matches first and build pages afterwards?
//    - Building a page needs `&mut self` (it sends a request)
//    - The text being scanned is borrowed while we iterate a regex over it
//    - Collecting Reference values first ends that borrow, then each page
//      is built in the order its name appeared
//
// 2. What is `let Some(x) = ... else { continue; }`?
//    - let-else: bind x if the pattern matches, otherwise run the else
//      block, which must leave the current scope (continue, return, ...)
//    - Here it skips commands the object class does not support
//
// 3. What is OnceLock?
//    - A cell that is filled exactly once, on first use
//    - Each regex is compiled the first time it is needed and reused after
//
// 4. Why does build_object_class_help not recurse for the Manager link?
//    - The manager is itself listed as an object class on the index page,
//      so its page is built from there; the header only needs the link
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecos::parse_response;
    use std::path::Path;

    // A scripted ECoS: answers known requests with raw protocol text and
    // everything else with an empty (absent) answer
    struct FakeEcos {
        answers: HashMap<String, &'static str>,
        requests: Vec<String>,
    }

    impl FakeEcos {
        fn new(answers: &[(&str, &'static str)]) -> Self {
            Self {
                answers: answers.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                requests: Vec::new(),
            }
        }

        fn count(&self, command: &str) -> usize {
            self.requests.iter().filter(|r| r.as_str() == command).count()
        }
    }

    impl HelpSource for FakeEcos {
        async fn request(&mut self, command: &str) -> Result<Option<String>> {
            self.requests.push(command.to_string());
            let raw = self.answers.get(command).copied().unwrap_or("");
            Ok(parse_response(raw.as_bytes())?)
        }
    }

    fn read(dir: &Path, filename: &str) -> String {
        fs::read_to_string(dir.join(filename)).unwrap()
    }

    const ROOT: &str = "#Session help\n\
                        #See help(syntax) for the syntax, or help(syntax) again.\n\
                        #Implemented objectclasses:\n\
                        #  ecos-link\n\
                        #  lok\n";

    const LOK_HEADER: &str = "#Object class lok\n#Manager: 10 (ecos-link)\n";

    const LOK_SET: &str = "#Usage: set(<id>, <option>)\n\
                           #Options for set command:\n\
                           #     name      Text\n\
                           #     speed     0..127\n";

    fn ecos() -> FakeEcos {
        FakeEcos::new(&[
            ("help()", ROOT),
            ("help(syntax)", "#Requests look like cmd(id, opt)\n"),
            ("help(ecos-link)", "#Object class ecos-link\n"),
            ("help(lok)", LOK_HEADER),
            ("help(lok,set)", LOK_SET),
            ("help(lok,set,name)", "#Name of the <locomotive>\n"),
            ("help(lok,set,speed)", "#Speed step\n"),
        ])
    }

    async fn generate(source: FakeEcos) -> (tempfile::TempDir, HelpGenerator<FakeEcos>) {
        let dir = tempfile::tempdir().unwrap();
        let mut generator = HelpGenerator::new(source, dir.path());
        generator.build().await.unwrap();
        (dir, generator)
    }

    #[tokio::test]
    async fn test_minimal_index_links_object_class() {
        let source = FakeEcos::new(&[(
            "help()",
            "#Session help\n#Implemented objectclasses:\n#  ecos-link\n",
        )]);
        let (dir, _) = generate(source).await;

        let index = read(dir.path(), "index.html");
        assert!(index.contains(r#"<a href="ecos-link.html">ecos-link</a>"#));
        assert!(index.contains("Implemented objectclasses:\n <a href=\"ecos-link.html\">"));
        assert!(dir.path().join("ecos-link.html").exists());
    }

    #[tokio::test]
    async fn test_generic_topic_pages() {
        let (dir, generator) = generate(ecos()).await;

        let index = read(dir.path(), "index.html");
        assert_eq!(index.matches(r#"<a href="syntax.html">help(syntax)</a>"#).count(), 2);

        let syntax = read(dir.path(), "syntax.html");
        assert!(syntax.contains("<title>Syntax :: ECoSNet protocol documentation</title>"));
        assert!(syntax.contains(r#"<a href="index.html">index</a> &raquo; syntax"#));

        // Second reference reuses the first page
        assert_eq!(generator.source().count("help(syntax)"), 1);
    }

    #[tokio::test]
    async fn test_object_class_commands_and_bookmarks() {
        let (dir, generator) = generate(ecos()).await;
        let lok = read(dir.path(), "lok.html");

        assert!(lok.contains(r#"Manager: 10 (<a href="ecos-link.html">ecos-link</a>)"#));
        assert!(lok.contains("\n<a id=\"set\"></a>Options for set command:\n"));
        assert!(!lok.contains(r#"<a id="get">"#));
        assert!(!lok.contains("Usage: set"));

        for command in COMMANDS {
            assert_eq!(generator.source().count(&format!("help(lok,{})", command)), 1);
        }
    }

    #[tokio::test]
    async fn test_attribute_pages_and_trail() {
        let (dir, _) = generate(ecos()).await;
        let lok = read(dir.path(), "lok.html");

        assert!(lok.contains("    <a href=\"lok.set.name.html\">name</a>      Text\n"));
        assert!(lok.contains("    <a href=\"lok.set.speed.html\">speed</a>     0..127\n"));

        let name = read(dir.path(), "lok.set.name.html");
        assert!(name.contains("<title>lok :: set :: name :: ECoSNet protocol documentation</title>"));
        assert!(name.contains(
            "<a href=\"index.html\">index</a> &raquo; <a href=\"lok.html\">lok</a> &raquo; \
             <a href=\"lok.html#set\">set</a> &raquo; name\n"
        ));
        assert!(name.contains("Name of the &lt;locomotive&gt;"));
        assert!(!name.contains("<locomotive>"));
    }

    #[tokio::test]
    async fn test_unsupported_command_writes_nothing() {
        let (dir, _) = generate(ecos()).await;

        let ecos_link = read(dir.path(), "ecos-link.html");
        assert!(!ecos_link.contains(r#"<a id="get">"#));

        let stray = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("ecos-link.get."));
        assert!(!stray);
    }

    #[tokio::test]
    async fn test_depth_first_write_order() {
        let (_, generator) = generate(ecos()).await;
        let order: Vec<_> = generator.pages().iter().map(|p| p.filename.as_str()).collect();

        assert_eq!(
            order,
            vec![
                "syntax.html",
                "ecos-link.html",
                "lok.set.name.html",
                "lok.set.speed.html",
                "lok.html",
                "index.html",
            ]
        );
    }

    #[tokio::test]
    async fn test_unanswered_help_still_writes_empty_pages() {
        // No answer for help(syntax), help(lok) or help(lok,set,name)
        let source = FakeEcos::new(&[
            ("help()", ROOT),
            ("help(lok,set)", LOK_SET),
            ("help(lok,set,speed)", "#Speed step\n"),
        ]);
        let (dir, generator) = generate(source).await;
        let rule = "-".repeat(80);

        let syntax = read(dir.path(), "syntax.html");
        assert!(syntax.contains(&format!("&raquo; syntax\n{}\n\n\n{}\n", rule, rule)));

        let lok = read(dir.path(), "lok.html");
        assert!(lok.contains(&format!("&raquo; lok\n{}\n\n\n<a id=\"set\"></a>Options", rule)));

        let name = read(dir.path(), "lok.set.name.html");
        assert!(name.contains(&format!("&raquo; name\n{}\n\n\n{}\n", rule, rule)));

        let index = read(dir.path(), "index.html");
        assert!(index.contains(r#"<a href="syntax.html">help(syntax)</a>"#));
        assert!(index.contains(r#"<a href="lok.html">lok</a>"#));
        assert!(lok.contains(r#"<a href="lok.set.name.html">name</a>"#));

        assert!(crate::checker::check_output(dir.path()).unwrap().is_ok());

        let source = generator.source();
        assert_eq!(source.count("help(syntax)"), 1);
        assert_eq!(source.count("help(lok)"), 1);
        assert_eq!(source.count("help(lok,set,name)"), 1);
    }

    #[tokio::test]
    async fn test_generated_links_all_resolve() {
        let (dir, _) = generate(ecos()).await;

        let report = crate::checker::check_output(dir.path()).unwrap();
        assert!(report.is_ok(), "broken links: {:?}", report.broken);
        assert_eq!(report.pages_checked, 6);
    }

    #[tokio::test]
    async fn test_missing_classes_marker_is_fatal() {
        let source = FakeEcos::new(&[("help()", "#Session help\n")]);
        let dir = tempfile::tempdir().unwrap();
        let mut generator = HelpGenerator::new(source, dir.path());

        let err = generator.build().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProtocolError>(),
            Some(ProtocolError::MissingMarker { .. })
        ));
        assert!(!dir.path().join("index.html").exists());
    }

    #[tokio::test]
    async fn test_missing_options_marker_is_fatal() {
        let source = FakeEcos::new(&[
            ("help()", "#Implemented objectclasses:\n#  lok\n"),
            ("help(lok,get)", "#Usage: get(<id>)\n"),
        ]);
        let dir = tempfile::tempdir().unwrap();
        let mut generator = HelpGenerator::new(source, dir.path());

        let err = generator.build().await.unwrap_err();
        assert!(err.to_string().contains("Options for get command:"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("syntax"), "Syntax");
        assert_eq!(capitalize(""), "");
    }
}

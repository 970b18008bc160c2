//! Upload scenarios loaded from YAML or JSON.
//!
//! A scenario describes an element tree, the element to upload through and
//! the files to offer. Building it yields a [`MockDocument`]; running it
//! performs the upload and reports the outcome with the full event log.
//!
//! ```yaml
//! name: label upload
//! document:
//!   - tag: form
//!     children:
//!       - tag: label
//!         ref: label
//!         attrs: { for: element }
//!       - tag: input
//!         attrs: { id: element, type: file, accept: "image/*" }
//! target: label
//! files:
//!   - name: hello.png
//!     content: hello
//! ```

use crate::config::UploadOptions;
use crate::document::{Document, NodeId};
use crate::file::{guess_mime_type, FileDescriptor, FileList};
use crate::mock::{EventRecord, MockDocument};
use crate::result::{GestoError, GestoResult};
use crate::upload::{upload, UploadOutcome};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// One element of the scenario tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Tag name
    pub tag: String,
    /// Attributes; empty values stand for boolean attributes
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Name the scenario uses to refer to this element
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    /// Element with no attributes or children
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Name this element
    #[must_use]
    pub fn with_ref(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Append a child
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }
}

/// A file offered by the scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// File name
    pub name: String,
    /// MIME type; guessed from the extension when absent
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Text contents
    #[serde(default)]
    pub content: String,
}

impl FileSpec {
    /// Materialise the descriptor
    #[must_use]
    pub fn to_descriptor(&self) -> FileDescriptor {
        let mime = self
            .mime_type
            .clone()
            .unwrap_or_else(|| guess_mime_type(&self.name));
        FileDescriptor::new(self.name.clone(), mime, self.content.as_bytes().to_vec())
    }
}

/// A complete upload scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Elements appended to `body`, in order
    pub document: Vec<ElementSpec>,
    /// `ref` or `id` of the element to upload through
    pub target: String,
    /// `ref` or `id` of an element focused before the upload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused: Option<String>,
    /// Files offered
    #[serde(default)]
    pub files: Vec<FileSpec>,
    /// Pointer options
    #[serde(default)]
    pub options: UploadOptions,
}

/// Document built from a scenario, with its named elements
#[derive(Debug)]
pub struct BuiltScenario {
    /// The document
    pub document: MockDocument,
    /// Element to upload through
    pub target: NodeId,
    /// Elements by `ref`
    pub refs: BTreeMap<String, NodeId>,
}

/// Result of running a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub name: String,
    /// What the upload did
    pub outcome: UploadOutcome,
    /// Every dispatched event, in order
    pub events: Vec<EventRecord>,
    /// Files held by the effective target afterwards
    pub files: FileList,
    /// Description of the effective target, e.g. `input#element[type="file"]`
    pub effective: String,
}

impl ScenarioReport {
    /// One line per event, as in [`MockDocument::snapshot`]
    #[must_use]
    pub fn event_log(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

impl Scenario {
    /// Parse from YAML
    ///
    /// # Errors
    ///
    /// Returns [`GestoError::Yaml`] on malformed input.
    pub fn from_yaml(yaml: &str) -> GestoResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse from JSON
    ///
    /// # Errors
    ///
    /// Returns [`GestoError::Json`] on malformed input.
    pub fn from_json(json: &str) -> GestoResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, has another extension or
    /// does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> GestoResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml(&text),
            Some("json") => Self::from_json(&text),
            _ => Err(GestoError::scenario(format!(
                "unsupported scenario format: {}",
                path.display()
            ))),
        }
    }

    /// Build the document and locate the target
    ///
    /// # Errors
    ///
    /// Returns [`GestoError::Scenario`] for duplicate refs or a target (or
    /// focused element) that names nothing.
    pub fn build(&self) -> GestoResult<BuiltScenario> {
        let mut document = MockDocument::new();
        let mut refs = BTreeMap::new();
        let body = document.body();
        for element in &self.document {
            append_spec(&mut document, body, element, &mut refs)?;
        }

        let target = lookup(&document, &refs, &self.target)?;
        if let Some(focused) = &self.focused {
            let node = lookup(&document, &refs, focused)?;
            document.set_active_element(Some(node));
        }
        debug!(scenario = %self.name, target = %target, elements = refs.len(), "scenario built");
        Ok(BuiltScenario {
            document,
            target,
            refs,
        })
    }

    /// Build, upload and report
    ///
    /// # Errors
    ///
    /// Returns build errors and any error raised by the upload itself.
    pub fn run(&self) -> GestoResult<ScenarioReport> {
        let BuiltScenario {
            mut document,
            target,
            ..
        } = self.build()?;
        let files: Vec<_> = self.files.iter().map(FileSpec::to_descriptor).collect();
        let outcome = upload(&mut document, target, files, &self.options)?;
        let effective = outcome.resolution.effective;
        Ok(ScenarioReport {
            name: self.name.clone(),
            files: document.files(effective),
            effective: document.describe(effective),
            events: document.events().to_vec(),
            outcome,
        })
    }
}

fn append_spec(
    doc: &mut MockDocument,
    parent: NodeId,
    spec: &ElementSpec,
    refs: &mut BTreeMap<String, NodeId>,
) -> GestoResult<()> {
    if spec.tag.trim().is_empty() {
        return Err(GestoError::scenario("element without a tag"));
    }
    let node = doc.create_element(&spec.tag);
    for (name, value) in &spec.attrs {
        doc.set_attribute(node, name, value);
    }
    doc.append_child(parent, node);

    if let Some(reference) = &spec.reference {
        if refs.insert(reference.clone(), node).is_some() {
            return Err(GestoError::scenario(format!("duplicate ref '{reference}'")));
        }
    }
    for child in &spec.children {
        append_spec(doc, node, child, refs)?;
    }
    Ok(())
}

fn lookup(doc: &MockDocument, refs: &BTreeMap<String, NodeId>, name: &str) -> GestoResult<NodeId> {
    refs.get(name)
        .copied()
        .or_else(|| doc.element_by_id(name))
        .ok_or_else(|| GestoError::scenario(format!("no element with ref or id '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{RejectReason, UploadStatus};

    const LABEL_YAML: &str = r#"
name: label upload
document:
  - tag: form
    children:
      - tag: label
        ref: label
        attrs: { for: element }
      - tag: input
        attrs: { id: element, type: file, accept: "image/*" }
target: label
files:
  - name: hello.png
    content: hello
  - name: notes.txt
"#;

    // =========================================================================
    // H₀-SCENARIO-01: Loading
    // =========================================================================

    #[test]
    fn h0_scenario_01_parse_yaml() {
        let scenario = Scenario::from_yaml(LABEL_YAML).unwrap();
        assert_eq!(scenario.name, "label upload");
        assert_eq!(scenario.document[0].children.len(), 2);
        assert_eq!(scenario.document[0].children[0].reference.as_deref(), Some("label"));
        assert_eq!(scenario.files[1].content, "");
        assert_eq!(scenario.options, UploadOptions::default());
    }

    #[test]
    fn h0_scenario_02_parse_json() {
        let json = r#"{
            "document": [{"tag": "input", "attrs": {"id": "f", "type": "file"}}],
            "target": "f",
            "files": [{"name": "a.bin", "type": "application/x-custom"}],
            "options": {"coordinates": {"x": 5.0, "y": 6.0}}
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert_eq!(
            scenario.files[0].to_descriptor().mime_type(),
            "application/x-custom"
        );
        assert!(scenario.options.coordinates.is_some());
    }

    #[test]
    fn h0_scenario_03_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("upload.yml");
        std::fs::write(&yaml, LABEL_YAML).unwrap();
        assert!(Scenario::from_path(&yaml).is_ok());

        let toml = dir.path().join("upload.toml");
        std::fs::write(&toml, "target = 'x'").unwrap();
        assert!(matches!(
            Scenario::from_path(&toml),
            Err(GestoError::Scenario { .. })
        ));

        assert!(matches!(
            Scenario::from_path(dir.path().join("missing.json")),
            Err(GestoError::Io(_))
        ));
    }

    #[test]
    fn h0_scenario_04_malformed_yaml() {
        assert!(matches!(
            Scenario::from_yaml("document: ["),
            Err(GestoError::Yaml(_))
        ));
    }

    // =========================================================================
    // H₀-SCENARIO-05: Building
    // =========================================================================

    #[test]
    fn h0_scenario_05_build_resolves_ref_and_id() {
        let scenario = Scenario::from_yaml(LABEL_YAML).unwrap();
        let built = scenario.build().unwrap();
        assert_eq!(built.refs.get("label"), Some(&built.target));
        assert!(built.document.is_label(built.target));
        assert!(built.document.element_by_id("element").is_some());
    }

    #[test]
    fn h0_scenario_06_unknown_target() {
        let scenario = Scenario {
            name: String::new(),
            document: vec![ElementSpec::new("input").with_attr("type", "file")],
            target: "nowhere".into(),
            focused: None,
            files: vec![],
            options: UploadOptions::default(),
        };
        let err = scenario.build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Scenario error: no element with ref or id 'nowhere'"
        );
    }

    #[test]
    fn h0_scenario_07_duplicate_ref() {
        let scenario = Scenario {
            name: String::new(),
            document: vec![
                ElementSpec::new("input").with_ref("a"),
                ElementSpec::new("label").with_ref("a"),
            ],
            target: "a".into(),
            focused: None,
            files: vec![],
            options: UploadOptions::default(),
        };
        assert!(matches!(scenario.build(), Err(GestoError::Scenario { .. })));
    }

    #[test]
    fn h0_scenario_08_focused_element() {
        let scenario = Scenario {
            name: String::new(),
            document: vec![ElementSpec::new("input")
                .with_attr("type", "file")
                .with_ref("input")],
            target: "input".into(),
            focused: Some("input".into()),
            files: vec![],
            options: UploadOptions::default(),
        };
        let built = scenario.build().unwrap();
        assert_eq!(built.document.active_element(), Some(built.target));
    }

    // =========================================================================
    // H₀-SCENARIO-09: Running
    // =========================================================================

    #[test]
    fn h0_scenario_09_run_label_upload() {
        let report = Scenario::from_yaml(LABEL_YAML).unwrap().run().unwrap();
        assert!(report.outcome.is_committed());
        assert_eq!(report.files.names(), vec!["hello.png"]);
        assert_eq!(report.outcome.rejected.len(), 1);
        assert_eq!(report.effective, "input#element[type=\"file\"]");
        assert_eq!(report.event_log()[0], "label[for=\"element\"] - pointerover");
        assert_eq!(report.event_log().last().unwrap(), "input#element[type=\"file\"] - change");
    }

    #[test]
    fn h0_scenario_10_run_disabled() {
        let scenario = Scenario {
            name: "disabled".into(),
            document: vec![ElementSpec::new("input")
                .with_attr("type", "file")
                .with_attr("disabled", "")
                .with_ref("input")],
            target: "input".into(),
            focused: None,
            files: vec![FileSpec {
                name: "a.png".into(),
                mime_type: None,
                content: String::new(),
            }],
            options: UploadOptions::default(),
        };
        let report = scenario.run().unwrap();
        assert_eq!(
            report.outcome.status,
            UploadStatus::Rejected(RejectReason::Disabled)
        );
        assert!(report.files.is_empty());
    }

    #[test]
    fn h0_scenario_11_report_serializes() {
        let report = Scenario::from_yaml(LABEL_YAML).unwrap().run().unwrap();
        let json = serde_json::to_string(&report).unwrap();
        let back: ScenarioReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}

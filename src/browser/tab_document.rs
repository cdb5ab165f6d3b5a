use crate::dom::{BoundingBox, ElementNode, LiveDocument, MemoryDocument, NodeId};
use crate::error::{ExtractError, Result};
use headless_chrome::Tab;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Page-side handle registry, evaluated before every expression as `R`
const HANDLES_JS: &str = include_str!("handles.js");

/// Expression returning `{ viewport, root }` with `root` in `ElementNode` form
const SNAPSHOT_JS: &str = include_str!("snapshot.js");

/// Envelope every evaluation returns
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Reply<T> {
    Ok(T),
    Unknown(usize),
    Err(String),
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    viewport: BoundingBox,
    root: ElementNode,
}

/// [`LiveDocument`] backed by a Chrome tab
///
/// Node handles index a registry kept in the page (`window.__domRecipe`), so
/// they stay valid until the page navigates away. Every operation is a single
/// script evaluation.
pub struct TabDocument {
    tab: Arc<Tab>,
    root: NodeId,
}

impl TabDocument {
    /// Attach to the document currently loaded in `tab`
    pub fn new(tab: Arc<Tab>) -> Result<Self> {
        let root: usize = evaluate(&tab, "R.id(document.documentElement)")?;
        Ok(Self { tab, root: NodeId::new(root) })
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn eval<T: DeserializeOwned>(&self, expression: &str) -> Result<T> {
        evaluate(&self.tab, expression)
    }

    /// `R.get(<id>)`
    fn node(node: NodeId) -> String {
        format!("R.get({})", node.index())
    }
}

/// Quote a string as a JavaScript literal
fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

fn evaluate<T: DeserializeOwned>(tab: &Tab, expression: &str) -> Result<T> {
    let script = format!(
        r#"(function () {{
{HANDLES_JS}
try {{
    const value = ({expression});
    return JSON.stringify({{ ok: value === undefined ? null : value }});
}} catch (e) {{
    if (e && e.unknown !== undefined) {{
        return JSON.stringify({{ unknown: e.unknown }});
    }}
    return JSON.stringify({{ err: e && e.name ? e.name + ': ' + e.message : String(e) }});
}}
}})()"#
    );

    let result = tab
        .evaluate(&script, false)
        .map_err(|e| ExtractError::EvaluationFailed(format!("Failed to execute script: {}", e)))?;

    let value = result
        .value
        .ok_or_else(|| ExtractError::EvaluationFailed("No value returned from script".to_string()))?;

    let json: String = serde_json::from_value(value)
        .map_err(|e| ExtractError::EvaluationFailed(format!("Failed to get JSON string: {}", e)))?;

    parse_reply(&json)
}

fn parse_reply<T: DeserializeOwned>(json: &str) -> Result<T> {
    match serde_json::from_str::<Reply<T>>(json)? {
        Reply::Ok(value) => Ok(value),
        Reply::Unknown(id) => Err(ExtractError::UnknownNode(NodeId::new(id))),
        Reply::Err(message) => Err(ExtractError::EvaluationFailed(message)),
    }
}

impl LiveDocument for TabDocument {
    fn root(&self) -> NodeId {
        self.root
    }

    fn query(&self, context: NodeId, selector: &str, direct_child_only: bool) -> Result<Vec<NodeId>> {
        let found = if direct_child_only {
            "Array.from(ctx.children).filter((c) => c.matches(sel))"
        } else {
            "Array.from(ctx.querySelectorAll(sel))"
        };
        let expression = format!(
            "((ctx, sel) => {}.map((n) => R.id(n)))({}, {})",
            found,
            Self::node(context),
            js_string(selector)
        );

        let ids: Vec<usize> = self.eval(&expression).map_err(|e| match e {
            ExtractError::EvaluationFailed(reason) if reason.starts_with("SyntaxError") => {
                ExtractError::InvalidSelector { selector: selector.to_string(), reason }
            }
            other => other,
        })?;
        Ok(ids.into_iter().map(NodeId::new).collect())
    }

    fn tag(&self, node: NodeId) -> Result<String> {
        self.eval(&format!("{}.tagName.toLowerCase()", Self::node(node)))
    }

    fn text(&self, node: NodeId) -> Result<String> {
        self.eval(&format!("((n) => n.innerText ?? n.textContent ?? '')({})", Self::node(node)))
    }

    fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>> {
        self.eval(&format!("{}.getAttribute({})", Self::node(node), js_string(name)))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<()> {
        self.eval(&format!(
            "{}.setAttribute({}, {})",
            Self::node(node),
            js_string(name),
            js_string(value)
        ))
    }

    fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        let parent: Option<usize> = self.eval(&format!(
            "((n) => n.parentElement ? R.id(n.parentElement) : null)({})",
            Self::node(node)
        ))?;
        Ok(parent.map(NodeId::new))
    }

    fn bounding_box(&self, node: NodeId) -> Result<Option<BoundingBox>> {
        self.eval(&format!(
            "((r) => ({{ x: r.x, y: r.y, width: r.width, height: r.height }}))({}.getBoundingClientRect())",
            Self::node(node)
        ))
    }

    fn viewport(&self) -> Result<BoundingBox> {
        self.eval("({ x: 0, y: 0, width: window.innerWidth, height: window.innerHeight })")
    }

    fn input_value(&self, node: NodeId) -> Result<Option<String>> {
        self.eval(&format!(
            "((n) => 'value' in n ? String(n.value) : n.getAttribute('value'))({})",
            Self::node(node)
        ))
    }

    fn is_checked(&self, node: NodeId) -> Result<bool> {
        self.eval(&format!("!!{}.checked", Self::node(node)))
    }

    fn serialize(&self, node: NodeId) -> Result<String> {
        self.eval(&format!("{}.outerHTML", Self::node(node)))
    }

    fn clone_document(&self) -> Result<MemoryDocument> {
        let snapshot: Snapshot = self.eval(SNAPSHOT_JS)?;
        log::debug!("Snapshot taken: {} elements", snapshot.root.count_elements());
        Ok(MemoryDocument::from_element(&snapshot.root).with_viewport(snapshot.viewport))
    }
}

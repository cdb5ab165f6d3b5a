use crate::dom::css::quote_css_string;
use crate::dom::{LiveDocument, NodeId};
use crate::error::{ExtractError, Result};
use crate::extract::attributes::compose_attributes;
use crate::extract::metadata::extract_metadata;
use crate::extract::naming::{join_name, resolve_name};
use crate::extract::output::OutputNode;
use crate::extract::registry::InteractionRegistry;
use crate::extract::text::{collapse_whitespace, resolve_text};
use crate::extract::ExtractorConfig;
use crate::recipe::RecipeNode;
use std::sync::Arc;

/// Walks a recipe tree in lockstep with a live document
///
/// Each pass tags interactive live nodes with their semantic names, records
/// them in the registry and builds the simplified output tree.
pub struct TreeTransducer<'a> {
    doc: &'a mut dyn LiveDocument,
    config: &'a ExtractorConfig,
    registry: &'a mut InteractionRegistry,
}

impl<'a> TreeTransducer<'a> {
    pub fn new(
        doc: &'a mut dyn LiveDocument,
        config: &'a ExtractorConfig,
        registry: &'a mut InteractionRegistry,
    ) -> Self {
        Self { doc, config, registry }
    }

    /// Process `node` with `recipe`, recursing into the recipe's children
    ///
    /// `parent_name` is the name prefix handed down by the parent and `index`
    /// the position of `node` among its recipe's matches.
    pub fn process(
        &mut self,
        node: NodeId,
        recipe: &Arc<RecipeNode>,
        parent_name: &str,
        index: usize,
    ) -> Result<OutputNode> {
        let tag = self.doc.tag(node)?;
        let text = resolve_text(&*self.doc, node, recipe)?;

        let mut output = OutputNode::new(recipe.tag_name.clone().unwrap_or_else(|| tag.clone()));
        if recipe.attach_text && !text.is_empty() {
            output.text = Some(text.clone());
        }

        let resolved = resolve_name(&recipe.name, parent_name, &text, index);
        let name = resolved.usable();
        if let Some(name) = name {
            output.set_attribute("name", name);
        }

        extract_metadata(&mut *self.doc, node, recipe, self.config)?;

        if recipe.clickable {
            let name = name.ok_or_else(|| {
                ExtractError::ContractViolation(format!(
                    "clickable recipe '{}' resolved no name for {}",
                    recipe.selector, node
                ))
            })?;
            self.tag_clickable(node, recipe, name)?;
        }

        // Live control state below overwrites the static markup copied here
        compose_attributes(&*self.doc, node, recipe, &self.config.preserved_attributes, &mut output)?;

        match tag.as_str() {
            "input" => self.tag_input(node, recipe, name, &mut output)?,
            "select" => match name {
                Some(name) => self.expand_select(node, recipe, name, &mut output)?,
                None => log::debug!("Unnamed select {} not expanded", node),
            },
            _ => {}
        }

        for child_recipe in &recipe.children {
            let context = if child_recipe.query_from_root { self.doc.root() } else { node };
            let matches = self.doc.query(context, &child_recipe.selector, child_recipe.direct_child_only)?;
            if matches.is_empty() {
                log::debug!("Child recipe '{}' matched nothing below {}", child_recipe.selector, context);
            }

            for (i, child) in matches.into_iter().enumerate() {
                let child_output = self.process(child, child_recipe, &resolved.child_prefix, i)?;
                output.push_child(child_output);

                if let Some(every) = recipe.separator_every {
                    if i.checked_rem(every) == Some(0) {
                        output.push_separator();
                    }
                    output.push_separator();
                }
            }
        }

        if output.children.is_empty() {
            if let Some(placeholder) = &recipe.empty_placeholder {
                output.text = Some(placeholder.clone());
            }
        }

        Ok(output)
    }

    fn tag_clickable(&mut self, node: NodeId, recipe: &Arc<RecipeNode>, name: &str) -> Result<()> {
        let target = match &recipe.click_selector {
            Some(selector) => self.doc.query_first(node, selector)?,
            None => Some(node),
        };
        let Some(target) = target else {
            log::debug!("Click target '{}' missing below {}, '{}' not tagged", recipe.selector, node, name);
            return Ok(());
        };

        self.doc.set_attribute(target, &self.config.clickable_attribute, name)?;
        self.registry.register_clickable(name, Arc::clone(recipe));
        Ok(())
    }

    fn tag_input(
        &mut self,
        node: NodeId,
        recipe: &Arc<RecipeNode>,
        name: Option<&str>,
        output: &mut OutputNode,
    ) -> Result<()> {
        let input_type = self.doc.attribute(node, "type")?.map(|t| t.to_ascii_lowercase());

        match input_type.as_deref().unwrap_or("text") {
            "text" | "number" => {
                if let Some(value) = self.doc.input_value(node)? {
                    output.set_attribute("value", value);
                }
                match name {
                    Some(name) => {
                        self.doc.set_attribute(node, &self.config.input_attribute, name)?;
                        self.registry.register_input(name, Arc::clone(recipe));
                    }
                    None => log::debug!("Unnamed input {} not tagged", node),
                }
            }
            "radio" => {
                output.set_attribute("checked", self.doc.is_checked(node)?.to_string());
                match name {
                    Some(name) => {
                        self.doc.set_attribute(node, &self.config.clickable_attribute, name)?;
                        self.registry.register_clickable(name, Arc::clone(recipe));
                    }
                    None => log::debug!("Unnamed radio {} not tagged", node),
                }
            }
            "checkbox" => {
                output.set_attribute("checked", self.doc.is_checked(node)?.to_string());
            }
            _ => {}
        }
        Ok(())
    }

    /// Emit the current-value label and every option of a selection control
    fn expand_select(
        &mut self,
        node: NodeId,
        recipe: &Arc<RecipeNode>,
        name: &str,
        output: &mut OutputNode,
    ) -> Result<()> {
        self.doc.set_attribute(node, &self.config.select_attribute, name)?;

        let label = match self.doc.parent(node)? {
            Some(parent) => self.doc.query_first(parent, &self.config.dropdown_label_selector)?,
            None => None,
        };
        match label {
            Some(label) => {
                let label_name = join_name(name, "open_drop_down_list");
                let label_output = OutputNode::new(self.doc.tag(label)?)
                    .with_text(collapse_whitespace(&self.doc.text(label)?))
                    .with_attribute("name", label_name.as_str());
                output.push_child(label_output);

                self.doc.set_attribute(label, &self.config.clickable_attribute, &label_name)?;
                self.registry.register_clickable(label_name, Arc::clone(recipe));
            }
            None => log::debug!("No dropdown label found for select '{}'", name),
        }

        let Some(id) = self.doc.attribute(node, "id")?.filter(|id| !id.is_empty()) else {
            log::debug!("Select '{}' has no id, options not listed", name);
            return Ok(());
        };

        let selector = format!("{}[id^={}]", self.config.dropdown_option_tag, quote_css_string(&id));
        for option in self.doc.query(self.doc.root(), &selector, false)? {
            if option == node {
                continue;
            }

            let text = collapse_whitespace(&self.doc.text(option)?);
            // Options sharing a display text share a name; the last one registered wins.
            let option_name = format!("{}.{}", name, text);
            let value = self.doc.attribute(option, "value")?.unwrap_or_else(|| text.clone());
            let selected = self.doc.attribute(option, "aria-selected")?.as_deref() == Some("true");

            output.push_child(
                OutputNode::new("option")
                    .with_text(text)
                    .with_attribute("value", value)
                    .with_attribute("name", option_name.as_str())
                    .with_attribute("selected", selected.to_string()),
            );

            self.doc.set_attribute(option, &self.config.clickable_attribute, &option_name)?;
            self.registry.register_clickable(option_name, Arc::clone(recipe));
        }
        Ok(())
    }
}

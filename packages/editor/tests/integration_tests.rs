//! Integration tests for the editor store

use pagecraft_catalog::Catalog;
use pagecraft_editor::{EditorConfig, EditorError, EditorMode, EditorStore, MutationOutcome, NoopReason};
use pagecraft_hydration::{deserialize, serialize};
use pagecraft_schema::{
    Component, ComponentType, EditAction, EditableType, Element, ElementProps, ElementType, Node,
    NodePath, Rect, Section, SectionType, Template,
};
use serde_json::json;
use std::sync::Arc;

fn business_store() -> anyhow::Result<EditorStore> {
    let catalog = Arc::new(Catalog::builtin()?);
    let mut store = EditorStore::init(EditorConfig::default(), catalog);
    store.select_template("business")?;
    Ok(store)
}

fn template(store: &EditorStore) -> Template {
    store.template().cloned().expect("template loaded")
}

#[test]
fn test_select_then_edit() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let before = template(&store);

    store.select_component("header", "navbar", Some(Rect::new(0.0, 0.0, 1200.0, 80.0)))?;
    assert_eq!(store.current_focused_element_id(), Some("navbar"));

    let logo = NodePath::element("header", "navbar", "logo");
    let outcome = store.update_property(&logo, "text", json!("Acme"))?;
    assert!(outcome.is_applied());

    let after = template(&store);
    assert_eq!(
        after.element("header", "navbar", "logo").and_then(|e| e.property("text")),
        Some(json!("Acme"))
    );

    // Nothing else moved: restoring the one property gives back the original
    let mut restored = after.clone();
    restored
        .element_mut("header", "navbar", "logo")
        .expect("logo")
        .set_property("text", json!("Business Co"))?;
    assert_eq!(restored, before);
    Ok(())
}

#[test]
fn test_failed_hydration_preserves_state() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let before = template(&store);
    let version = store.version();

    let mut payload = serialize(&store.catalog().instantiate("storefront")?)?;
    payload["sections"][1]["id"] = payload["sections"][0]["id"].clone();

    match store.load_template(&payload) {
        Err(EditorError::Hydration(e)) => assert!(!e.violations().is_empty()),
        other => panic!("expected hydration error, got {:?}", other),
    }
    assert_eq!(template(&store), before);
    assert_eq!(store.version(), version);
    Ok(())
}

#[test]
fn test_hydration_error_lists_every_violation() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let payload = json!({
        "id": "broken",
        "name": "Broken",
        "title": "Broken",
        "sections": [
            { "id": "a", "type": "HeroSection", "name": "A", "components": [] },
            { "id": "a", "type": "NoSuchSection", "name": "B", "components": [] },
        ],
    });

    let Err(EditorError::Hydration(e)) = store.load_template(&payload) else {
        panic!("expected hydration error");
    };
    assert_eq!(e.violations().len(), 2);
    Ok(())
}

#[test]
fn test_lock_enforcement() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let before = template(&store);

    let copyright = NodePath::element("footer", "legal", "copyright");
    let result = store.update_property(&copyright, "text", json!("© Someone else"));

    match result {
        Err(EditorError::LockedNode {
            editable, action, ..
        }) => {
            assert_eq!(editable, EditableType::LockedEdit);
            assert_eq!(action, EditAction::UpdateProperty);
        }
        other => panic!("expected LockedNode, got {:?}", other),
    }
    assert_eq!(template(&store), before);
    Ok(())
}

fn copyright(id: &str, text: &str) -> anyhow::Result<Element> {
    let map = json!({ "text": text }).as_object().cloned().unwrap_or_default();
    Ok(Element::new(id, ElementProps::from_map(ElementType::Copyright, map)?))
}

#[test]
fn test_locked_edit_blocks_replace_insert_and_delete() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let before = template(&store);
    let path = NodePath::element("footer", "legal", "copyright");

    let replaced = store.replace_node(&path, Node::Element(copyright("copyright", "hacked")?));
    let added = store.add_element("footer", "legal", 0, copyright("extra", "more")?);
    let deleted = store.delete_node(&path);

    for (action, result) in [
        (EditAction::Replace, replaced),
        (EditAction::InsertChild, added),
        (EditAction::Delete, deleted),
    ] {
        match result {
            Err(EditorError::LockedNode {
                editable,
                action: blocked,
                ..
            }) => {
                assert_eq!(editable, EditableType::LockedEdit);
                assert_eq!(blocked, action);
            }
            other => panic!("expected LockedNode for {:?}, got {:?}", action, other),
        }
    }
    assert_eq!(template(&store), before);
    assert!(!store.can_undo());
    Ok(())
}

#[test]
fn test_undo_keeps_loaded_empty_properties() -> anyhow::Result<()> {
    let catalog = Arc::new(Catalog::builtin()?);
    let mut payload = serialize(catalog.get("business")?)?;
    payload["sections"][1]["properties"] = json!({});

    let mut store = EditorStore::init(EditorConfig::default(), catalog);
    store.load_template(&payload)?;
    let before = template(&store);

    let hero = NodePath::section("hero");
    store.update_property(&hero, "layout", json!("split"))?;
    store.undo()?;

    assert_eq!(template(&store), before);
    assert_eq!(serialize(&template(&store))?, payload);

    store.redo()?;
    assert_eq!(
        template(&store).section("hero").and_then(|s| s.property("layout")),
        Some(json!("split"))
    );
    Ok(())
}

#[test]
fn test_edited_tree_round_trips() -> anyhow::Result<()> {
    let mut store = business_store()?;

    let stats = Component::new("stats", ComponentType::Testimonial)
        .with_element(copyright("note", "Since 1999")?);
    store.add_section(2, Section::new("about", SectionType::TestimonialsSection, "About"))?;
    store.add_component("about", 0, stats)?;
    store.add_element("about", "stats", 1, copyright("fine-print", "Terms apply")?)?;

    let about = NodePath::section("about");
    store.update_property(&about, "spacing", json!({ "top": "2rem", "gutter": "8px" }))?;
    store.update_property(&about, "layout", json!("grid"))?;
    store.update_property(
        &NodePath::component("about", "stats"),
        "columns",
        json!(3),
    )?;

    let edited = template(&store);
    let value = serialize(&edited)?;
    assert_eq!(value["sections"][2]["spacing"]["gutter"], json!("8px"));

    let restored = deserialize(&value)?;
    assert_eq!(restored, edited);
    assert_eq!(serialize(&restored)?, value);
    Ok(())
}

#[test]
fn test_locked_replacing_blocks_delete() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let before = template(&store);

    store.select_element("header", "navbar", "cta", None)?;
    let result = store.delete_selected_item();

    assert!(matches!(result, Err(ref e) if e.is_locked()));
    assert_eq!(template(&store), before);
    assert_eq!(store.current_focused_element_id(), Some("cta"));
    Ok(())
}

#[test]
fn test_unlock_then_delete() -> anyhow::Result<()> {
    let mut store = business_store()?;
    let header = NodePath::section("header");

    store.set_editable(&header, None)?;
    store.select_element("header", "navbar", "cta", None)?;
    store.delete_selected_item()?;

    assert!(template(&store).element("header", "navbar", "cta").is_none());
    Ok(())
}

#[test]
fn test_selection_clears_on_delete() -> anyhow::Result<()> {
    let mut store = business_store()?;

    store.select_element(
        "hero",
        "banner",
        "subtitle",
        Some(Rect::new(40.0, 200.0, 600.0, 48.0)),
    )?;
    assert!(store.selected_item_rect().is_some());

    let outcome = store.delete_selected_item()?;
    assert!(outcome.is_applied());

    assert_eq!(store.current_focused_element_id(), None);
    assert_eq!(store.selected_item_rect(), None);
    let banner = template(&store);
    let banner = banner.component("hero", "banner").expect("banner");
    assert!(banner.element("subtitle").is_none());
    Ok(())
}

#[test]
fn test_delete_with_nothing_selected() -> anyhow::Result<()> {
    let mut store = business_store()?;
    assert_eq!(
        store.delete_selected_item()?,
        MutationOutcome::Noop {
            reason: NoopReason::NothingSelected
        }
    );
    Ok(())
}

#[test]
fn test_preview_isolation() -> anyhow::Result<()> {
    let mut store = business_store()?;
    store.select_element("hero", "banner", "title", None)?;
    store.toggle_preview_mode()?;
    assert_eq!(store.mode(), EditorMode::Previewing);

    let before = template(&store);
    let previewing = MutationOutcome::Noop {
        reason: NoopReason::Previewing,
    };

    let title = NodePath::element("hero", "banner", "title");
    assert_eq!(store.update_property(&title, "text", json!("Hi"))?, previewing);
    assert_eq!(store.delete_selected_item()?, previewing);
    assert_eq!(store.select_section("footer", None)?, previewing);
    assert_eq!(store.select_template("storefront")?, previewing);
    assert_eq!(store.undo()?, previewing);
    assert_eq!(template(&store), before);

    store.toggle_preview_mode()?;
    assert_eq!(store.mode(), EditorMode::Editing);
    assert!(store.is_selected(&title));
    Ok(())
}

#[test]
fn test_reselecting_clears_history_and_selection() -> anyhow::Result<()> {
    let mut store = business_store()?;
    store.select_section("hero", None)?;
    store.update_property(&NodePath::section("hero"), "name", json!("Intro"))?;
    assert!(store.can_undo());

    store.select_template("storefront")?;
    assert!(!store.can_undo());
    assert_eq!(store.focused_path(), None);
    assert_eq!(template(&store).id, "storefront");
    Ok(())
}

#[test]
fn test_catalog_is_not_mutated_by_edits() -> anyhow::Result<()> {
    let mut store = business_store()?;
    store.update_property(
        &NodePath::element("hero", "banner", "title"),
        "text",
        json!("Changed"),
    )?;

    let pristine = store.catalog().get("business")?;
    assert_ne!(pristine, &template(&store));
    assert_eq!(
        pristine.element("hero", "banner", "title").and_then(|e| e.property("text")),
        store
            .catalog()
            .instantiate("business")?
            .element("hero", "banner", "title")
            .and_then(|e| e.property("text"))
    );
    Ok(())
}

use std::sync::{Arc, Mutex};

use page_assets::{
    AssetConfig, AssetManager, AssetRenderer, BundleRenderer, LogLevel, Logger, MemorySink,
    RequestContext, TagBundleRenderer,
};

/// Bundle renderer that remembers every list it was asked to render.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl BundleRenderer for Recorder {
    fn render(&self, bundles: &[String]) -> String {
        self.calls.lock().unwrap().push(bundles.to_vec());
        format!("<!-- {} -->", bundles.join(" "))
    }
}

#[test]
fn layout_and_partials_render_a_full_page() {
    let manager = AssetManager::new(
        AssetConfig::default(),
        TagBundleRenderer::scripts().with_prefix("/static"),
        TagBundleRenderer::styles().with_prefix("/static"),
    );
    let mut ctx = RequestContext::new();

    // layout
    manager
        .require_style_bundles_for_layout(&mut ctx, ["~/css/site"])
        .unwrap();
    manager
        .require_script_bundles_for_layout(&mut ctx, ["~/js/jquery", "~/js/site"])
        .unwrap();
    // page and a partial rendered twice
    for _ in 0..2 {
        manager
            .require_script(&mut ctx, "<script>initWidget();</script>")
            .unwrap();
        manager
            .require_script_bundles(&mut ctx, ["~/js/widget"])
            .unwrap();
    }

    let head = manager.render_required_styles(&mut ctx).unwrap();
    assert_eq!(head, "<link href=\"/static/css/site\" rel=\"stylesheet\"/>\n");

    let body = manager.render_required_scripts(&mut ctx).unwrap();
    assert_eq!(
        body,
        concat!(
            "<script src=\"/static/js/jquery\"></script>\n",
            "<script src=\"/static/js/site\"></script>\n",
            "<script>initWidget();</script>\n",
            "<script src=\"/static/js/widget\"></script>\n",
        )
    );
}

#[test]
fn scenario_single_script_is_emitted_once() {
    let recorder = Recorder::default();
    let manager = AssetManager::new(AssetConfig::default(), recorder.clone(), recorder.clone());
    let mut ctx = RequestContext::new();

    manager.require_script(&mut ctx, "a.js").unwrap();
    manager.require_script(&mut ctx, "a.js").unwrap();

    assert_eq!(
        manager.render_required_scripts(&mut ctx).unwrap(),
        "a.js\n<!--  -->\n"
    );
    assert_eq!(
        manager.render_required_scripts(&mut ctx).unwrap(),
        "<!--  -->\n"
    );

    // re-declaring after render does not bring it back
    manager.require_script(&mut ctx, "a.js").unwrap();
    assert_eq!(
        manager.render_required_scripts(&mut ctx).unwrap(),
        "<!--  -->\n"
    );
    assert_eq!(recorder.calls().len(), 3);
    assert!(recorder.calls().iter().all(Vec::is_empty));
}

#[test]
fn interleaved_bundles_use_two_calls() {
    let recorder = Recorder::default();
    let manager = AssetManager::new(AssetConfig::default(), recorder.clone(), recorder.clone());
    let mut ctx = RequestContext::new();

    manager.require_script_bundles(&mut ctx, ["B1"]).unwrap();
    manager.require_script(&mut ctx, "S1").unwrap();
    manager.require_script_bundles(&mut ctx, ["B2"]).unwrap();

    let markup = manager.render_required_scripts(&mut ctx).unwrap();
    assert_eq!(markup, "<!-- B1 -->\nS1\n<!-- B2 -->\n");
    assert_eq!(recorder.calls(), vec![vec!["B1"], vec!["B2"]]);
}

#[test]
fn requests_do_not_share_registries() {
    let sink = MemorySink::new();
    let logger = Logger::new(sink.clone()).with_min_level(LogLevel::Debug);
    let manager = AssetManager::with_tag_renderers(AssetConfig::default()).with_logger(logger);

    let mut first = RequestContext::new();
    let mut second = RequestContext::new();
    manager.require_style(&mut first, "<style>a</style>").unwrap();
    manager.require_style(&mut second, "<style>a</style>").unwrap();

    assert_eq!(
        manager.render_required_styles(&mut first).unwrap(),
        "<style>a</style>\n\n"
    );
    assert_eq!(
        manager.render_required_styles(&mut second).unwrap(),
        "<style>a</style>\n\n"
    );

    let created = sink
        .messages()
        .into_iter()
        .filter(|message| message == "registry.created")
        .count();
    assert_eq!(created, 2);
}

#[test]
fn renderer_is_usable_without_a_manager() {
    let mut registry = page_assets::AssetRegistry::new();
    registry.require(page_assets::Asset::style_bundle("a"), page_assets::Placement::Page);
    registry.require(page_assets::Asset::style_bundle("b"), page_assets::Placement::Page);

    let pass = AssetRenderer::with_default()
        .render(
            &mut registry,
            page_assets::AssetCategory::Style,
            &TagBundleRenderer::styles(),
        )
        .unwrap();

    assert_eq!(pass.bundle_calls, 1);
    assert_eq!(
        pass.markup,
        "<link href=\"a\" rel=\"stylesheet\"/>\n<link href=\"b\" rel=\"stylesheet\"/>\n"
    );
}

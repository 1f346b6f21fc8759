use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use page_assets::logging::{LogEvent, LogSink};
use page_assets::{
    AssetConfig, AssetKind, AssetManager, Logger, LoggingResult, Placement, Preload,
    RequestContext, Result,
};

#[derive(Clone, Default)]
struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _event: &LogEvent) -> LoggingResult<()> {
        Ok(())
    }
}

const PARTIALS: usize = 40;

fn page_render(c: &mut Criterion) {
    let manager = build_manager();
    c.bench_function("page_render", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new();
            render_page(&manager, &mut ctx, black_box(PARTIALS)).expect("page render");
        });
    });
}

fn duplicate_heavy_page(c: &mut Criterion) {
    let manager = build_manager();
    c.bench_function("duplicate_heavy_page", |b| {
        b.iter(|| {
            let mut ctx = RequestContext::new();
            for _ in 0..black_box(PARTIALS) {
                manager
                    .require_script_bundles(&mut ctx, ["~/js/widget", "~/js/grid"])
                    .expect("declare");
                manager
                    .require_script(&mut ctx, "<script>widget.init();</script>")
                    .expect("declare");
            }
            manager.render_required_scripts(&mut ctx).expect("scripts");
        });
    });
}

fn build_manager() -> AssetManager {
    let config = AssetConfig::default()
        .with_preload(Preload::new(
            AssetKind::StyleBundle,
            "~/css/site",
            Placement::Layout,
        ))
        .with_preload(Preload::new(
            AssetKind::ScriptBundle,
            "~/js/jquery",
            Placement::Layout,
        ));
    let mut manager =
        AssetManager::with_tag_renderers(config).with_logger(Logger::new(NullSink::default()));
    manager.enable_metrics();
    manager
}

fn render_page(manager: &AssetManager, ctx: &mut RequestContext, partials: usize) -> Result<()> {
    for index in 0..partials {
        manager.require_style(ctx, format!("<style>.p{index}{{}}</style>"))?;
        manager.require_script_bundles(ctx, [format!("~/js/partial{}", index % 8)])?;
        if index % 5 == 0 {
            manager.require_script(ctx, format!("<script>boot({index});</script>"))?;
        }
    }
    manager.render_required_styles(ctx)?;
    manager.render_required_scripts(ctx)?;
    Ok(())
}

criterion_group!(benches, page_render, duplicate_heavy_page);
criterion_main!(benches);

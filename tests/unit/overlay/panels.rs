use super::*;
use crate::{assets::svg_raster::SvgRasterizer, foundation::core::Viewport};

fn ctx() -> LayoutCtx {
    LayoutCtx {
        viewport: Viewport::new(1280.0, 800.0).unwrap(),
    }
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn hero_fades_and_shrinks_over_first_stretch() {
    let o = OverlayLayer::db11().unwrap();
    let start = o.visual(PanelId::Hero, 0.0, ctx());
    assert_eq!(start.opacity, 1.0);
    assert_eq!(start.scale.x, 1.0);
    let mid = o.visual(PanelId::Hero, 0.075, ctx());
    assert!(approx(mid.opacity, 0.5));
    assert!(approx(mid.scale.x, 0.9));
    let gone = o.visual(PanelId::Hero, 0.5, ctx());
    assert_eq!(gone.opacity, 0.0);
    assert!(approx(gone.scale.x, 0.8));
}

#[test]
fn title_rises_shrinks_and_dims() {
    let o = OverlayLayer::db11().unwrap();
    let end = o.visual(PanelId::Title, 0.3, ctx());
    assert!(approx(end.translate.y, -320.0));
    assert!(approx(end.scale.x, 0.5));
    assert!(approx(o.visual(PanelId::Title, 0.1, ctx()).opacity, 0.4));
    assert!(approx(o.visual(PanelId::Title, 0.5, ctx()).opacity, 0.4));
    assert!(approx(o.visual(PanelId::Title, 0.9, ctx()).opacity, 0.2));
    assert_eq!(o.visual(PanelId::Title, 1.0, ctx()).opacity, 0.0);
}

#[test]
fn design_window() {
    let o = OverlayLayer::db11().unwrap();
    assert_eq!(o.visual(PanelId::Design, 0.2, ctx()).opacity, 0.0);
    assert!(approx(o.visual(PanelId::Design, 0.3, ctx()).opacity, 0.5));
    assert_eq!(o.visual(PanelId::Design, 0.45, ctx()).opacity, 1.0);
    assert!(approx(o.visual(PanelId::Design, 0.45, ctx()).translate.x, -25.0));
    assert_eq!(o.visual(PanelId::Design, 0.7, ctx()).opacity, 0.0);
}

#[test]
fn engine_arrives_at_the_end() {
    let o = OverlayLayer::db11().unwrap();
    assert_eq!(o.visual(PanelId::Engine, 0.7, ctx()).opacity, 0.0);
    assert_eq!(o.visual(PanelId::Engine, 0.7, ctx()).translate.y, 50.0);
    assert!(approx(o.visual(PanelId::Engine, 0.8, ctx()).opacity, 0.5));
    let end = o.visual(PanelId::Engine, 1.0, ctx());
    assert_eq!(end.opacity, 1.0);
    assert_eq!(end.translate.y, 0.0);
}

#[test]
fn entries_play_on_mount_time() {
    let o = OverlayLayer::db11().unwrap();
    let at = |t: f64, name: &str| {
        o.entries(t, ctx())
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
            .unwrap()
    };
    assert_eq!(at(0.0, "title.text").opacity, 0.0);
    assert_eq!(at(0.0, "title.text").translate.y, 100.0);
    assert_eq!(at(5.0, "title.text").opacity, 1.0);
    assert_eq!(at(2.4, "hero.divider").scale.x, 0.0);
    assert_eq!(at(3.5, "hero.divider").scale.x, 1.0);
    let tag = at(3.5, "hero.tagline").opacity;
    assert!(tag > 0.0 && tag < 1.0);
}

#[test]
fn markup_parses_at_every_stage() {
    let o = OverlayLayer::db11().unwrap();
    let r = SvgRasterizer::new(&[]);
    for &(p, t) in &[(0.0, 0.0), (0.0, 4.0), (0.3, 6.0), (0.45, 6.0), (1.0, 6.0)] {
        let mut m = Markup::new();
        o.write_markup(&mut m, p, t, ctx());
        let svg = m.finish(1280.0, 800.0);
        r.parse(&svg).unwrap();
    }
}

#[test]
fn hidden_panels_emit_nothing() {
    let o = OverlayLayer::db11().unwrap();
    let mut m = Markup::new();
    o.write_markup(&mut m, 0.2, 10.0, ctx());
    let svg = m.finish(1280.0, 800.0);
    assert!(!svg.contains("THE DEFINITIVE GT"));
    assert!(!svg.contains("V12 POWERTRAIN"));
    assert!(svg.contains("DB11"));
}

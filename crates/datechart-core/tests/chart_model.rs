// File: crates/datechart-core/tests/chart_model.rs
// Purpose: End-to-end behavior of DateChart: bucketing, geometry, colors, redraws and interaction.

use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use datechart_core::{
    ChartConfig, ChartError, Color, DateBucket, DateChart, DateSeries, Margin, NullRenderer, MIN_HEIGHT,
};

fn series(values: &[f64]) -> DateSeries {
    series_from(1, values)
}

/// Daily series in January 2015 starting on `first_day`.
fn series_from(first_day: u32, values: &[f64]) -> DateSeries {
    let dates = (0..values.len())
        .map(|i| Utc.with_ymd_and_hms(2015, 1, first_day + i as u32, 0, 0, 0).unwrap())
        .collect();
    DateSeries::new(dates, values.to_vec()).expect("aligned series")
}

/// 220x165 container with default margins -> 200x100 plot.
fn chart() -> DateChart<NullRenderer> {
    DateChart::new(NullRenderer::new(220.0, 165.0))
}

fn frames(chart: &DateChart<NullRenderer>) -> usize {
    chart.container().expect("container").frames_rendered
}

#[test]
fn similar_leading_values_merge() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 0.0, 100.0]));

    let state = c.data().expect("state");
    let xs: Vec<&str> = state.buckets.iter().map(|b| b.x.as_str()).collect();
    let ys: Vec<f64> = state.buckets.iter().map(|b| b.y).collect();
    assert_eq!(xs, vec!["Jan 1st, 2015", "Jan 3rd, 2015"]);
    assert_eq!(ys, vec![0.0, 100.0]);
    assert_eq!((state.min, state.max, state.range), (0.0, 100.0, 100.0));
}

#[test]
fn flat_series_has_defined_color() {
    let mut c = chart();
    c.set_data(&series(&[5.0, 5.0, 5.0, 5.0]));

    let state = c.data().expect("state");
    assert_eq!(state.buckets.len(), 1);
    assert_eq!((state.min, state.max, state.range), (5.0, 5.0, 0.0));
    let bars = c.bars();
    assert_eq!(bars[0].fill, Color::RED);
    assert_eq!(bars[0].background.width, 200.0);
}

#[test]
fn set_data_is_idempotent_and_does_not_redraw() {
    let mut c = chart();
    let input = series(&[3.0, 80.0, 12.0, 12.1, 40.0]);
    c.set_data(&input);
    let first = c.data().cloned();
    c.set_data(&input);
    assert_eq!(c.data().cloned(), first);
    assert_eq!(frames(&c), 0);
}

#[test]
fn bar_geometry_follows_scales() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 100.0, 0.0, 100.0]));
    let bars = c.bars();
    assert_eq!(bars.len(), 4);

    for (i, bar) in bars.iter().enumerate() {
        assert_relative_eq!(bar.background.left, 50.0 * i as f32);
        assert_relative_eq!(bar.background.width, 200.0 / 3.0);
        assert_eq!(bar.background.height, 100.0);
        assert_eq!(bar.stroke, Color::BLACK);
    }
    assert_eq!(bars[0].foreground.top, 100.0);
    assert_eq!(bars[0].foreground.height, MIN_HEIGHT);
    assert_eq!(bars[1].foreground.top, 0.0);
    assert_eq!(bars[1].foreground.height, 100.0 + MIN_HEIGHT);

    assert_eq!(bars[0].fill, Color::RED);
    assert_eq!(bars[1].fill, Color::BLUE);
    assert_eq!(bars[1].label.date, "Jan 2nd, 2015");
    assert_eq!(bars[1].label.value, "100");
}

#[test]
fn color_stops_change_colors_not_data() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 0.0, 100.0]));
    let before = c.data().cloned();

    c.set_color_stops(vec![Color::parse("#fff").unwrap(), Color::parse("#000").unwrap()])
        .expect("two stops")
        .draw();

    let fills: Vec<Color> = c.bars().iter().map(|b| b.fill).collect();
    assert_eq!(fills, vec![Color::WHITE, Color::BLACK]);
    assert_eq!(c.data().cloned(), before);
    // One redraw from the setter, one from draw().
    assert_eq!(frames(&c), 2);
}

#[test]
fn too_few_color_stops_keep_previous_scale() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 100.0]));
    let err = c.set_color_stops(vec![Color::WHITE]).err().expect("rejected");
    assert!(matches!(err, ChartError::TooFewColorStops { got: 1 }));
    assert_eq!(c.bars()[0].fill, Color::RED);
    assert_eq!(frames(&c), 0);
}

#[test]
fn click_handler_runs_once_with_bucket() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 100.0, 0.0, 100.0]));

    let seen: Rc<RefCell<Vec<DateBucket>>> = Rc::default();
    let sink = Rc::clone(&seen);
    c.set_click(move |b| sink.borrow_mut().push(b.clone()));
    assert!(c.has_click_handler());
    assert!(c.frame().expect("frame").clickable);

    assert!(c.activate(2));
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].x, "Jan 3rd, 2015");
    assert_eq!(seen[0].y, 0.0);
}

#[test]
fn activation_without_handler_or_bucket_is_ignored() {
    let mut c = chart();
    c.set_data(&series(&[1.0, 50.0]));
    assert!(!c.activate(0));

    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    c.set_click(move |_| *h.borrow_mut() += 1);
    assert!(!c.activate(9));
    c.clear_click();
    assert!(!c.activate(0));
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn redraw_triggers() {
    let mut c = chart();
    c.set_data(&series(&[1.0, 50.0, 3.0]));
    assert_eq!(frames(&c), 0);

    c.set_width(300.0).set_height(80.0);
    assert_eq!(frames(&c), 2);

    c.set_margin(Margin::new(0.0, 0.0, 0.0, 0.0)).set_active_index(Some(1));
    assert_eq!(frames(&c), 2);

    c.set_click(|_| {});
    assert_eq!(frames(&c), 3);

    c.draw();
    assert_eq!(frames(&c), 4);
    assert_eq!(c.container().unwrap().last_bar_count, 3);
}

#[test]
fn active_index_survives_redraws() {
    let mut c = chart();
    c.set_data(&series(&[1.0, 50.0, 3.0]));
    c.set_active_index(Some(1)).draw();
    c.set_width(120.0);

    let active: Vec<bool> = c.frame().expect("frame").bars.iter().map(|b| b.active).collect();
    assert_eq!(active, vec![false, true, false]);
    assert_eq!(c.active_index(), Some(1));
}

#[test]
fn empty_data_is_a_quiet_state() {
    let mut c = chart();
    c.set_data(&DateSeries::default());
    assert!(c.buckets().is_empty());
    assert!(!c.is_populated());
    assert!(c.frame().is_none());
    c.draw();
    assert_eq!(frames(&c), 0);
    assert!(!c.activate(0));
}

#[test]
fn pointer_hover_and_click() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 100.0, 0.0, 100.0]));
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    c.set_click(move |b: &DateBucket| sink.borrow_mut().push(b.x.clone()));

    // Plot x = 60 is covered by bars 0 and 1; the later bar wins.
    assert_eq!(c.bar_at(70.0, 50.0), Some(1));
    assert_eq!(c.bar_at(5.0, 50.0), None);

    c.pointer_moved(70.0, 50.0);
    let (label, anchor) = c.container().unwrap().label.clone().expect("label shown");
    assert_eq!(label.date, "Jan 2nd, 2015");
    assert_relative_eq!(anchor.x, 10.0 + 50.0 + 100.0 / 3.0, epsilon = 1e-3);
    assert_relative_eq!(anchor.y, 10.0);

    c.pointer_moved(5.0, 50.0);
    assert!(c.container().unwrap().label.is_none());

    assert!(c.pointer_clicked(15.0, 50.0));
    assert!(!c.pointer_clicked(500.0, 50.0));
    assert_eq!(*clicked.borrow(), vec!["Jan 1st, 2015".to_string()]);
}

#[test]
fn config_overrides_defaults() {
    let config = ChartConfig::from_json(
        r##"{"margin": {"top": 0, "right": 0, "bottom": 0, "left": 0},
            "width": 50, "color_stops": ["#000", "#fff"]}"##,
    )
    .expect("config");
    let mut c = DateChart::with_config(NullRenderer::new(220.0, 165.0), config).expect("chart");
    assert_eq!((c.width(), c.height()), (50.0, 165.0));

    c.set_data(&series(&[0.0, 100.0]));
    let fills: Vec<Color> = c.bars().iter().map(|b| b.fill).collect();
    assert_eq!(fills, vec![Color::BLACK, Color::WHITE]);
}

#[test]
fn detached_chart_computes_but_never_draws() {
    let mut c = DateChart::<NullRenderer>::detached();
    c.set_width(100.0).set_height(50.0).set_data(&series(&[2.0, 4.0]));
    c.draw();
    assert!(c.container().is_none());
    assert_eq!(c.bars().len(), 2);

    c.attach(NullRenderer::new(10.0, 10.0));
    c.draw();
    assert_eq!(frames(&c), 1);
}

#[test]
fn negative_values_sit_on_the_baseline() {
    let mut c = chart();
    c.set_data(&series(&[-100.0, 10.0]));
    let bars = c.bars();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].foreground.top, 100.0);
    assert_eq!(bars[0].foreground.height, MIN_HEIGHT);
    assert_eq!(bars[1].foreground.top, 0.0);
    assert_eq!(bars[1].foreground.height, 100.0 + MIN_HEIGHT);
    assert!(bars.iter().all(|b| b.foreground.bottom() <= 100.0 + MIN_HEIGHT));
}

#[test]
fn clicks_and_hovers_use_the_drawn_bars() {
    let mut c = chart();
    c.set_data(&series(&[0.0, 100.0, 0.0, 100.0]));
    let clicked = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicked);
    c.set_click(move |b: &DateBucket| sink.borrow_mut().push((b.x.clone(), b.y)));

    // New data is pending until the next draw.
    c.set_data(&series_from(11, &[7.0, 50.0]));
    assert!(c.pointer_clicked(15.0, 50.0));
    c.pointer_moved(70.0, 50.0);
    let (label, _) = c.container().unwrap().label.clone().expect("label shown");
    assert_eq!(label.date, "Jan 2nd, 2015");

    c.draw();
    assert!(c.pointer_clicked(15.0, 50.0));
    assert_eq!(
        *clicked.borrow(),
        vec![("Jan 1st, 2015".to_string(), 0.0), ("Jan 11th, 2015".to_string(), 7.0)]
    );
}

#[test]
fn interaction_needs_a_drawn_frame() {
    let mut c = DateChart::<NullRenderer>::detached();
    c.set_width(200.0).set_height(100.0).set_data(&series(&[0.0, 100.0]));
    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    c.set_click(move |_| *h.borrow_mut() += 1);
    assert_eq!(c.bar_at(15.0, 50.0), None);
    assert!(!c.activate(0));

    c.attach(NullRenderer::new(220.0, 165.0));
    c.draw();
    assert!(c.activate(0));
    c.detach();
    assert!(!c.activate(0));
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn active_index_is_cleared_when_out_of_range() {
    let mut c = chart();
    c.set_data(&series(&[1.0, 50.0, 3.0]));
    c.set_active_index(Some(2));
    c.set_data(&series(&[1.0, 50.0]));
    assert_eq!(c.active_index(), None);

    c.set_active_index(Some(1));
    c.set_data(&series(&[1.0, 50.0, 3.0]));
    assert_eq!(c.active_index(), Some(1));
}

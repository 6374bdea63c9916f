use orbital::deck::{Deck, SlideDraft};
use orbital::gui::input::{InputController, InputEvent, Key, KeyBindings, PointerButton};
use orbital::gui::ring::{Direction, HitTarget, Point, ViewportTuning};
use orbital::summarize::{CommandSummarizer, FALLBACK_TITLE, ShellCommand};
use std::time::{Duration, Instant};

const VIEW: Point = Point {
    x: 1280.0,
    y: 720.0,
};

fn deck(n: usize) -> Deck {
    Deck::from_drafts(
        (0..n).map(|i| SlideDraft::new(format!("content {i}")).with_title(format!("Slide {i}"))),
    )
}

fn controller() -> InputController {
    InputController::new(ViewportTuning::default(), KeyBindings::default(), VIEW)
}

#[test]
fn test_next_walks_the_ring_and_wraps() {
    let deck = deck(4);
    let mut input = controller();

    let mut visited = Vec::new();
    for _ in 0..5 {
        input.navigate(&deck, Direction::Next);
        visited.push(input.active_index(&deck).unwrap());
    }
    assert_eq!(visited, vec![0, 1, 2, 3, 0]);
}

#[test]
fn test_previous_from_overview_enters_first_slide() {
    let deck = deck(4);
    let mut input = controller();
    input.navigate(&deck, Direction::Previous);
    assert_eq!(input.active_index(&deck), Some(0));
    input.navigate(&deck, Direction::Previous);
    assert_eq!(input.active_index(&deck), Some(3));
}

#[test]
fn test_deselect_restores_overview_after_any_gesture() {
    let deck = deck(6);
    let mut input = controller();
    let now = Instant::now();

    input.select_slide(&deck, deck.id_at(4));
    input.handle(
        InputEvent::PointerDown {
            position: Point::new(10.0, 10.0),
            button: PointerButton::Primary,
        },
        &deck,
        now,
    );
    input.handle(
        InputEvent::PointerMove {
            position: Point::new(300.0, -90.0),
        },
        &deck,
        now,
    );
    input.handle(
        InputEvent::PointerLeave {
            position: Point::new(300.0, -90.0),
        },
        &deck,
        now,
    );
    for _ in 0..7 {
        input.handle(
            InputEvent::Wheel {
                delta: Point::new(0.0, -60.0),
                modifier: true,
                position: Some(Point::new(900.0, 100.0)),
            },
            &deck,
            now,
        );
    }

    input.select_slide(&deck, None);
    let once = *input.state();
    assert_eq!(once.scale, 0.4);
    assert_eq!(once.translate, Point::ZERO);
    assert_eq!(once.active, None);

    // idempotent
    assert!(!input.select_slide(&deck, None));
    assert_eq!(*input.state(), once);
}

#[test]
fn test_scale_stays_clamped_under_wheel_storm() {
    let deck = deck(3);
    let mut input = controller();
    let start = Instant::now();
    let deltas = [-900.0, -35.0, 12.0, 4000.0, -1.0, 250.0, -20000.0, 77.0];

    for (i, delta) in deltas.iter().cycle().take(400).enumerate() {
        input.handle(
            InputEvent::Wheel {
                delta: Point::new(3.0, *delta),
                modifier: i % 3 != 0,
                position: Some(Point::new(100.0 + i as f64, 50.0)),
            },
            &deck,
            start + Duration::from_millis(i as u64 * 10),
        );
        let scale = input.state().scale;
        assert!((0.04..=12.0).contains(&scale), "scale {scale} escaped");
    }
}

#[test]
fn test_drag_pan_limit_holds() {
    let deck = deck(5);
    let mut input = controller();
    let now = Instant::now();
    let tuning = input.tuning().clone();

    input.select_slide(&deck, deck.id_at(2));
    input.handle(
        InputEvent::PointerDown {
            position: Point::ZERO,
            button: PointerButton::Primary,
        },
        &deck,
        now,
    );
    let mut pointer = Point::ZERO;
    for step in 0..300 {
        pointer = pointer + Point::new(41.0, if step % 2 == 0 { -73.0 } else { 19.0 });
        input.handle(InputEvent::PointerMove { position: pointer }, &deck, now);

        let state = input.state();
        let limit = tuning.ring_radius * state.scale.max(0.4) * 3.0;
        assert!(state.translate.x.abs() <= limit);
        assert!(state.translate.y.abs() <= limit);
    }
    assert_eq!(input.state().active, deck.id_at(2));
}

#[test]
fn test_zoom_out_recenters_ring() {
    let deck = deck(4);
    let mut input = controller();
    let now = Instant::now();
    input.select_slide(&deck, deck.id_at(1));
    input.select_slide(&deck, None);
    input.handle(
        InputEvent::Wheel {
            delta: Point::new(-200.0, 150.0),
            modifier: false,
            position: None,
        },
        &deck,
        now,
    );

    let mut crossed = 0;
    for _ in 0..12 {
        let before = *input.state();
        input.handle(
            InputEvent::Wheel {
                delta: Point::new(0.0, 15.0),
                modifier: true,
                position: None,
            },
            &deck,
            now,
        );
        let after = *input.state();
        if after.scale < before.scale && after.scale < 0.7 {
            crossed += 1;
            assert!(after.translate.length() < before.translate.length());
        }
    }
    assert!(crossed > 0);
}

#[test]
fn test_deleting_active_slide_resets_selection() {
    let mut deck = deck(4);
    let mut input = controller();
    let id = deck.id_at(3).unwrap();

    input.select_slide(&deck, Some(id));
    deck.remove(id);
    assert!(input.active_slide(&deck).is_none());
    input.reconcile(&deck);

    let state = input.state();
    assert_eq!(state.active, None);
    assert_eq!(state.scale, 0.4);
    assert_eq!(state.translate, Point::ZERO);
}

#[test]
fn test_escape_and_click_away_return_to_overview() {
    let deck = deck(4);
    let mut input = controller();
    let now = Instant::now();

    input.handle(InputEvent::Key(Key::ArrowRight), &deck, now);
    assert_eq!(input.active_index(&deck), Some(0));
    input.handle(InputEvent::Key(Key::Escape), &deck, now);
    assert!(input.state().is_overview(input.tuning()));

    input.handle(InputEvent::Key(Key::ArrowRight), &deck, now);
    let corner = Point::new(2.0, VIEW.y - 2.0);
    assert_eq!(input.hit_test(&deck, corner), HitTarget::Background);
    input.handle(
        InputEvent::PointerDown {
            position: corner,
            button: PointerButton::Primary,
        },
        &deck,
        now,
    );
    input.handle(InputEvent::PointerUp { position: corner }, &deck, now);
    assert_eq!(input.state().active, None);
}

#[tokio::test]
async fn test_failing_summarizer_still_creates_slide() {
    let mut deck = deck(2);
    let summarizer = CommandSummarizer::new(ShellCommand::new("exit 1"), Duration::from_secs(5));

    let slide = deck.create_slide(SlideDraft::new("some text"), &summarizer).await;
    assert_eq!(slide.title, FALLBACK_TITLE);
    assert_eq!(deck.len(), 3);
}

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use mapguess_shared::{load_map, MapEngine, MapError, Point, RoundTally, Size};
use tracing::{debug, info, warn};

use crate::components::help_overlay::HelpOverlay;
use crate::components::map_view::{EngineHandle, MapView, MAP_CANVAS_ID};
use crate::components::score_panel::ScorePanel;
use crate::content::{self, RoundSpec};
use crate::{coords, images};

const GUESS_MARKER: Asset = asset!("/assets/guess-marker.svg");
const CORRECT_MARKER: Asset = asset!("/assets/correct-marker.svg");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Guessing,
    Resolved,
    Finished,
}

/// Where play goes after the round at `index` is resolved.
fn advance(index: usize, round_count: usize) -> (Phase, usize) {
    if index + 1 < round_count {
        (Phase::Guessing, index + 1)
    } else {
        (Phase::Finished, index)
    }
}

fn canvas_size() -> Size {
    coords::canvas_rect(MAP_CANVAS_ID)
        .map(|(_, _, size)| size)
        .unwrap_or_default()
}

/// Per-game UI state. Every field is a signal, so the struct is `Copy` and
/// can move into any event handler.
#[derive(Clone, Copy)]
struct Session {
    round_index: Signal<usize>,
    phase: Signal<Phase>,
    accepting_guess: Signal<bool>,
    has_guess: Signal<bool>,
    tally: Signal<RoundTally>,
    time_left: Signal<Option<u32>>,
}

impl Session {
    fn set_phase(&mut self, phase: Phase) {
        self.phase.set(phase);
        self.accepting_guess.set(phase == Phase::Guessing);
    }

    /// Score the current round and show the answer.
    fn lock_in(&mut self, engine: &EngineHandle, round: &RoundSpec) {
        if *self.phase.peek() != Phase::Guessing {
            return;
        }
        let mut engine = engine.0.borrow_mut();
        engine.set_correct_location(Some(round.answer));
        engine.reveal_result(canvas_size());
        let score = self.tally.write().record(engine.guess(), round.answer);
        info!(round = %round.title, score, "round resolved");
        self.time_left.set(None);
        self.set_phase(Phase::Resolved);
    }

    /// Timer ran out: guess wherever the pointer is, then lock in.
    fn time_up(&mut self, engine: &EngineHandle, round: &RoundSpec) {
        if engine.0.borrow().guess().is_none() {
            let placed = engine
                .0
                .borrow_mut()
                .commit_guess_at_pointer(canvas_size());
            self.has_guess.set(placed.is_some());
        }
        self.lock_in(engine, round);
    }

    fn next_round(&mut self, engine: &EngineHandle, round_count: usize) {
        let (phase, index) = advance(*self.round_index.peek(), round_count);
        if phase == Phase::Guessing {
            engine.0.borrow_mut().start_round();
            self.has_guess.set(false);
            self.round_index.set(index);
        }
        self.set_phase(phase);
    }

    fn restart(&mut self, engine: &EngineHandle) {
        engine.0.borrow_mut().start_round();
        self.tally.write().reset();
        self.has_guess.set(false);
        self.round_index.set(0);
        self.set_phase(Phase::Guessing);
        engine.0.borrow_mut().reset_view();
    }
}

async fn load_markers(engine: EngineHandle) {
    let guess = images::load_image(GUESS_MARKER.to_string()).await;
    let correct = images::load_image(CORRECT_MARKER.to_string()).await;
    match (guess, correct) {
        (Ok(guess), Ok(correct)) => engine.0.borrow_mut().set_markers(guess, correct),
        (Err(e), _) | (_, Err(e)) => warn!(error = %e, "marker sprites unavailable"),
    }
}

#[component]
pub fn Game() -> Element {
    let rounds = use_hook(|| Rc::new(content::builtin_rounds()));
    let engine = use_hook(|| {
        EngineHandle(Rc::new(RefCell::new(MapEngine::new(content::map_config()))))
    });

    let mut session = Session {
        round_index: use_signal(|| 0usize),
        phase: use_signal(|| Phase::Guessing),
        accepting_guess: use_signal(|| true),
        has_guess: use_signal(|| false),
        tally: use_signal(RoundTally::default),
        time_left: use_signal(|| None::<u32>),
    };
    let mut show_help = use_signal(|| false);
    let mut show_debug = use_signal(|| false);
    let mut load_error = use_signal(|| None::<String>);
    let mut map_loading = use_signal(|| false);

    use_hook({
        let engine = engine.clone();
        move || {
            spawn(load_markers(engine));
        }
    });

    // Load the round's map when it differs from the one on screen
    use_effect({
        let engine = engine.clone();
        let rounds = rounds.clone();
        move || {
            let index = (session.round_index)();
            let Some(round) = rounds.get(index) else {
                return;
            };
            let same_map = engine.0.borrow().map_url() == Some(round.map_url.as_str());
            if same_map {
                engine.0.borrow_mut().reset_view();
                return;
            }
            let engine = engine.clone();
            let url = round.map_url.clone();
            map_loading.set(true);
            spawn(async move {
                match load_map(&engine.0, &url, images::load_image).await {
                    Ok(()) => load_error.set(None),
                    Err(MapError::Superseded { .. }) => {}
                    Err(e) => load_error.set(Some(e.to_string())),
                }
                // A newer request may still be in flight
                map_loading.set(engine.0.borrow().is_loading());
            });
        }
    });

    // Round timer
    use_effect({
        let engine = engine.clone();
        let rounds = rounds.clone();
        move || {
            let index = (session.round_index)();
            let Some(round) = rounds.get(index).cloned() else {
                return;
            };
            let Some(limit) = round.time_limit_secs else {
                session.time_left.set(None);
                return;
            };
            if *session.phase.peek() != Phase::Guessing {
                return;
            }
            debug!(round = %round.title, limit, "round timer started");
            session.time_left.set(Some(limit));
            let engine = engine.clone();
            spawn(async move {
                let mut session = session;
                loop {
                    TimeoutFuture::new(1000).await;
                    let still_running = *session.round_index.peek() == index
                        && *session.phase.peek() == Phase::Guessing;
                    if !still_running {
                        break;
                    }
                    let left = session.time_left.peek().unwrap_or(0).saturating_sub(1);
                    session.time_left.set(Some(left));
                    if left == 0 {
                        session.time_up(&engine, &round);
                        break;
                    }
                }
            });
        }
    });

    let round_count = rounds.len();
    let index = (session.round_index)();
    let Some(round) = rounds.get(index).cloned() else {
        return rsx! {
            div { class: "app",
                p { class: "empty-state", "No rounds available." }
            }
        };
    };
    let phase = (session.phase)();
    let guess_placed = (session.has_guess)();

    let on_key = {
        let engine = engine.clone();
        let round = round.clone();
        move |evt: Event<KeyboardData>| match evt.key() {
            Key::Escape => {
                let shown = *show_help.peek();
                show_help.set(!shown);
            }
            _ if *show_help.peek() => {}
            Key::Character(c) if c == " " => {
                evt.prevent_default();
                let current = *session.phase.peek();
                match current {
                    Phase::Guessing if *session.has_guess.peek() => session.lock_in(&engine, &round),
                    Phase::Guessing => {}
                    Phase::Resolved => session.next_round(&engine, round_count),
                    Phase::Finished => session.restart(&engine),
                }
            }
            Key::Character(c) if c.eq_ignore_ascii_case("r") => engine.0.borrow_mut().reset_view(),
            Key::Character(c) if c.eq_ignore_ascii_case("d") => {
                let shown = *show_debug.peek();
                show_debug.set(!shown);
            }
            _ => {}
        }
    };

    let on_action = {
        let engine = engine.clone();
        let round = round.clone();
        move |_: Event<MouseData>| {
            let current = *session.phase.peek();
            match current {
                Phase::Guessing => session.lock_in(&engine, &round),
                Phase::Resolved => session.next_round(&engine, round_count),
                Phase::Finished => session.restart(&engine),
            }
        }
    };

    let action_label = match phase {
        Phase::Guessing => "Guess",
        Phase::Resolved if index + 1 < round_count => "Next round",
        Phase::Resolved => "See results",
        Phase::Finished => "Play again",
    };
    let tally = session.tally.read().clone();

    rsx! {
        div { class: "app", tabindex: 0, onkeydown: on_key,
            div { class: "header",
                h1 { "Map Guess" }
                button { class: "help-button", onclick: move |_| show_help.set(true), "?" }
            }

            div { class: "sidebar",
                div { class: "panel photo-panel",
                    h3 { "{round.title}" }
                    img { class: "round-photo", src: "{round.photo_url}", alt: "{round.title}" }
                }

                ScorePanel {
                    tally: tally.clone(),
                    round_number: index + 1,
                    round_count,
                    time_left: (session.time_left)(),
                }

                if phase == Phase::Finished {
                    div { class: "panel final-score",
                        "Final score: {tally.total} / {tally.max_total()}"
                    }
                }

                if let Some(err) = load_error() {
                    div { class: "panel load-error", "{err}" }
                }

                button {
                    class: "action-button",
                    disabled: phase == Phase::Guessing && !guess_placed,
                    onclick: on_action,
                    "{action_label}"
                }
            }

            MapView {
                engine: engine.clone(),
                input_blocked: show_help,
                accepting_guess: session.accepting_guess,
                show_debug,
                loading: map_loading,
                on_guess: move |_: Point| session.has_guess.set(true),
            }

            HelpOverlay { show: show_help }
        }
    }
}

use dioxus::prelude::*;
use mapguess_shared::RoundTally;

#[component]
pub fn ScorePanel(
    tally: RoundTally,
    round_number: usize,
    round_count: usize,
    time_left: Option<u32>,
) -> Element {
    let last = tally
        .last_round
        .map(|points| format!("You earned {points} points"));

    rsx! {
        div { class: "panel score-panel",
            h3 { "Round {round_number} / {round_count}" }
            div { class: "score-total",
                "Score: {tally.total} / {tally.max_total()}"
            }
            if let Some(text) = last {
                div { class: "score-round", "{text}" }
            }
            if let Some(secs) = time_left {
                div { class: if secs <= 5 { "timer timer-low" } else { "timer" },
                    "{secs}s left"
                }
            }
        }
    }
}

use dioxus::prelude::*;

#[component]
pub fn HelpOverlay(show: Signal<bool>) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "help-overlay-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "help-overlay",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "How to Play" }

                p { "Study the photo, then click the spot on the map where you think it was taken. Lock in your guess to see how close you were." }

                div { class: "shortcut-section",
                    h3 { "Keyboard" }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Space" } }
                        span { "Lock in guess / next round" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "Esc" } }
                        span { "Toggle this help" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "R" } }
                        span { "Recenter the map" }
                    }
                    div { class: "shortcut-row",
                        span { class: "shortcut-keys", kbd { "D" } }
                        span { "Toggle frame rate readout" }
                    }
                }

                div { class: "help-divider" }

                div { class: "help-info-section",
                    h3 { "Map Interactions" }
                    p { "Drag to pan and scroll to zoom towards the cursor. On touch screens, drag with one finger and pinch with two. A click or tap that doesn't move the map places your guess." }
                }

                div { class: "help-info-section",
                    h3 { "Scoring" }
                    p { "Guesses within 50 map pixels of the answer earn the full 5000 points. The score falls off exponentially with distance after that. Rounds with a timer place your guess under the pointer when time runs out." }
                }

                button {
                    class: "close-help",
                    onclick: move |_| show.set(false),
                    "Close"
                }
            }
        }
    }
}

mod canvas;
mod components;
mod content;
mod coords;
mod images;
mod pages;

use dioxus::prelude::*;

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        pages::game::Game {}
    }
}

fn main() {
    launch(App);
}

use saavnplay::components::App;

fn main() {
    dioxus::launch(App);
}

fn main() {
    yew::Renderer::<ui::App>::new().render();
}

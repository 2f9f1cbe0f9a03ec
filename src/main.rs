fn main() {
    streamlag::app::startup::startup();
}

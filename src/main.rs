fn main() {
    waveshooter::game::run();
}

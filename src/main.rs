fn main() -> iced::Result {
    photo_triage::app::run()
}

fn main() {
    roomwalk::app::bootstrap::run_client_app();
}

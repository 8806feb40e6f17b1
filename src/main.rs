fn main() {
    install_log_viewer::run_app();
}

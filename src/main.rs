fn main() -> std::process::ExitCode {
    querygate_lib::run()
}

fn main() -> anyhow::Result<()> {
    appboot::run(std::env::args_os())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pathsense_cli::run()
}

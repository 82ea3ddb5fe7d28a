fn main() {
    combinatoria::cli::run();
}

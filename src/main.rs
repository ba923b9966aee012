fn main() {
    xplovo_lib::run()
}

fn main() -> Result<(), transgen_build_script_helper::Error> {
    transgen_build_script_helper::build("ageofempires.php")
}

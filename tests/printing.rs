use std::{error::Error, path::Path};

use test_utils::{check_evaluation, Expected};

const SRC_PATH: &str = "./demos/printing.rk";
const EXPECTED: Expected = Expected {
    stdout: "1 a int any <empty> <fn ref>\n-42\n(1 (deep))\n",
    stderr: "",
};

#[test]
fn print_formats_every_value_kind() -> Result<(), Box<dyn Error>> {
    check_evaluation(Path::new(SRC_PATH), EXPECTED)
}

use std::{error::Error, path::Path};

use test_utils::{check_evaluation, Expected};

#[test]
fn append_counts_through_the_length_field() -> Result<(), Box<dyn Error>> {
    check_evaluation(
        Path::new("./demos/append_length.rk"),
        Expected {
            stdout: "(2 a b)\n",
            stderr: "",
        },
    )
}

#[test]
fn typeof_prints_the_record_shape() -> Result<(), Box<dyn Error>> {
    check_evaluation(
        Path::new("./demos/typeof_record.rk"),
        Expected {
            stdout: "record { x: int y: string }\n",
            stderr: "",
        },
    )
}

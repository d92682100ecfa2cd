use formulix_rs::{Interpreter, ParamValue};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let parameter_sets = vec![
        HashMap::from([
            ("price".to_string(), ParamValue::from(120.0)),
            ("volume".to_string(), ParamValue::from(3000.0)),
        ]),
        HashMap::from([
            ("price".to_string(), ParamValue::from(80.0)),
            ("volume".to_string(), ParamValue::from(6000.0)),
        ]),
        HashMap::from([
            ("price".to_string(), ParamValue::from(95.5)),
            ("volume".to_string(), ParamValue::from(4500.0)),
        ]),
    ];

    let formula = "price * volume / 1000";

    let interpreter = Interpreter::new();
    for (i, result) in interpreter
        .evaluate_batch(formula, &parameter_sets, 2)
        .into_iter()
        .enumerate()
    {
        println!("Result {}: {:?}", i, result);
    }
}

use formulix_rs::{Interpreter, ParamValue};
use std::collections::HashMap;

fn main() {
    pretty_env_logger::init();

    let interpreter = Interpreter::new();

    let formula = "(price + shipping) * quantity - discount";
    let parameters: HashMap<String, ParamValue> = HashMap::from([
        ("price".to_string(), ParamValue::from(19.99)),
        ("shipping".to_string(), ParamValue::from(4.5)),
        ("quantity".to_string(), ParamValue::from(3)),
        ("discount".to_string(), ParamValue::from("10")),
    ]);

    match interpreter.evaluate(formula, &parameters, 2) {
        Ok(result) => println!("Result: {}", result),
        Err(err) => println!("Error: {}", err),
    }
}

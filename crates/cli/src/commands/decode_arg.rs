use frog_tips::clarity::{ClarityValue, FunctionArg};

/// Accepts either form the chain API reports. Anything starting with `0x`
/// or `0X` is read as the serialized hex, everything else as `repr`.
pub fn run(value: &str) -> anyhow::Result<ClarityValue> {
    let trimmed = value.trim_start();
    let arg = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        FunctionArg {
            hex: Some(value.to_string()),
            ..Default::default()
        }
    } else {
        FunctionArg {
            repr: Some(value.to_string()),
            ..Default::default()
        }
    };

    let decoded = arg
        .decode()
        .ok_or_else(|| anyhow::anyhow!("cannot decode clarity value {:?}", value))?;

    match decoded {
        ClarityValue::Int(v) => println!("int {}", v),
        ClarityValue::UInt(v) => println!("uint {}", v),
        ClarityValue::Bool(v) => println!("bool {}", v),
        ClarityValue::Other(tag) => println!("unsupported type tag 0x{:02x}", tag),
    }
    Ok(decoded)
}

//! Setting value validation.

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "GLITCH_MAX_OFFSET" => validate_int_range(value, 0, 10_000)?,
        "GLITCH_BAND_HEIGHT" => validate_int_range(value, 1, 10_000)?,
        "GLITCH_CHANNEL_SHIFT" => validate_int_range(value, 0, 1_000)?,
        "GLITCH_COLOR_PROB" | "GLITCH_SATURATION_PROB" | "GLITCH_BRIGHTNESS_PROB" => {
            validate_float_range(value, 0.0, 1.0)?
        }
        "GLITCH_SEED" => {
            if !value.is_empty() {
                value
                    .parse::<u64>()
                    .map_err(|_| "must be empty or a non-negative integer")?;
            }
        }
        "FRAME_FILL_RATIO" => {
            let v: f64 = value.parse().map_err(|_| "must be a float")?;
            if !(v > 0.0 && v <= 1.0) {
                return Err("must be greater than 0.0 and at most 1.0".into());
            }
        }
        "PIXEL_MODE" => {
            if value != "color" && value != "bw" {
                return Err("must be 'color' or 'bw'".into());
            }
        }
        "PIXEL_SIZE" => validate_int_range(value, 1, 1_000)?,
        "PIXEL_COLORS" => validate_int_range(value, 1, 256)?,
        "PIXEL_EDGE_ENHANCE" | "PIXEL_CONTRAST" => validate_float_range(value, 0.0, 10.0)?,
        "SOLD_OUT_BLUR_RADIUS" => validate_float_range(value, 0.0, 500.0)?,
        "SOLD_OUT_MARGIN" => validate_int_range(value, 0, 10_000)?,
        k if is_boolean_setting(k) => {
            if value != "true" && value != "false" {
                return Err("must be 'true' or 'false'".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if v < min || v > max {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn validate_float_range(value: &str, min: f64, max: f64) -> Result<(), String> {
    let v: f64 = value.parse().map_err(|_| "must be a float")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

fn is_boolean_setting(key: &str) -> bool {
    matches!(key, "PIXEL_DITHER")
}

use std::path::PathBuf;

use armory::api::{generate_weapons, Armory, GenerateConfig};
use armory::config::ForgeConfig;
use armory::PresetTable;
use jni::objects::{JClass, JString};
use jni::sys::jstring;
use jni::JNIEnv;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct CreateModelInput {
    description: String,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    config: Option<ForgeConfig>,
}

fn envelope(result: Result<Value, String>) -> String {
    let payload = match result {
        Ok(value) => json!({ "ok": true, "result": value }),
        Err(e) => json!({ "ok": false, "error": e }),
    };
    payload.to_string()
}

fn to_java(env: &JNIEnv, text: String) -> jstring {
    env.new_string(text)
        .map(|s| s.into_raw())
        .unwrap_or(std::ptr::null_mut())
}

fn read_input(env: &mut JNIEnv, json: &JString) -> Result<String, String> {
    env.get_string(json)
        .map(String::from)
        .map_err(|e| format!("invalid_input: {}", e))
}

// Internal functions for testing without JNI overhead
pub fn generate_weapons_internal(input: &str) -> String {
    envelope(generate_value(input))
}

fn generate_value(input: &str) -> Result<Value, String> {
    let cfg: GenerateConfig =
        serde_json::from_str(input).map_err(|e| format!("invalid_config: {}", e))?;
    let report = generate_weapons(cfg).map_err(|e| format!("{:#}", e))?;
    serde_json::to_value(report).map_err(|e| e.to_string())
}

pub fn personalities_internal() -> String {
    envelope(personalities_value())
}

fn personalities_value() -> Result<Value, String> {
    let table = PresetTable::builtin().map_err(|e| e.to_string())?;
    let mut presets = serde_json::Map::new();
    for name in table.names() {
        let components = serde_json::to_value(table.components(&name)).map_err(|e| e.to_string())?;
        presets.insert(name, components);
    }
    Ok(Value::Object(presets))
}

pub fn create_model_internal(input: &str) -> String {
    envelope(create_model_value(input))
}

fn create_model_value(input: &str) -> Result<Value, String> {
    let req: CreateModelInput =
        serde_json::from_str(input).map_err(|e| format!("invalid_config: {}", e))?;
    let mut armory =
        Armory::from_config(req.config.unwrap_or_default()).map_err(|e| format!("{:#}", e))?;
    let report = armory
        .create_model(&req.description, req.output_path.as_deref())
        .map_err(|e| format!("{:#}", e))?;
    serde_json::to_value(report).map_err(|e| e.to_string())
}

#[no_mangle]
pub extern "system" fn Java_com_armory_Ffi_version<'local>(
    env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    to_java(&env, format!("armory-ffi {}", env!("CARGO_PKG_VERSION")))
}

#[no_mangle]
pub extern "system" fn Java_com_armory_Ffi_generateWeaponsJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let out = match read_input(&mut env, &json) {
        Ok(input) => generate_weapons_internal(&input),
        Err(e) => envelope(Err(e)),
    };
    to_java(&env, out)
}

#[no_mangle]
pub extern "system" fn Java_com_armory_Ffi_personalitiesJson(env: JNIEnv, _class: JClass) -> jstring {
    to_java(&env, personalities_internal())
}

#[no_mangle]
pub extern "system" fn Java_com_armory_Ffi_createModelJson(
    mut env: JNIEnv,
    _class: JClass,
    json: JString,
) -> jstring {
    let out = match read_input(&mut env, &json) {
        Ok(input) => create_model_internal(&input),
        Err(e) => envelope(Err(e)),
    };
    to_java(&env, out)
}

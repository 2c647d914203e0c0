const BASE_URL_KEY: &str = "OTAKUDESU_RS_BASE_URL";

fn main() {
    let base_url_value = std::env::var(BASE_URL_KEY);
    println!("cargo:rerun-if-env-changed={}", BASE_URL_KEY);
    let base_url_value = match base_url_value.as_ref() {
        Ok(v) if v.ends_with('/') => v.clone(),
        Ok(v) => format!("{v}/"),
        Err(std::env::VarError::NotPresent) => "https://otakudesu.best/".to_string(),
        Err(std::env::VarError::NotUnicode(_)) => {
            panic!(
                "the environment variable `{}` is invalid unicode",
                BASE_URL_KEY
            );
        }
    };

    println!("cargo:rustc-env={}={}", BASE_URL_KEY, base_url_value);
}

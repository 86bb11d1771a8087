use anyhow::{Ok, Result};

use super::config_model::{AuthSecret, Bkash, Database, DotEnvyConfig, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let bkash = Bkash {
        merchant_number: std::env::var("BKASH_MERCHANT_NUMBER")
            .expect("BKASH_MERCHANT_NUMBER is invalid"),
        qr_code_url: std::env::var("BKASH_QR_URL").expect("BKASH_QR_URL is invalid"),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        bkash,
    })
}

pub fn get_auth_secret() -> Result<AuthSecret> {
    dotenvy::dotenv().ok();

    Ok(AuthSecret {
        jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET is invalid"),
    })
}

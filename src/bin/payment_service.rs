//! 결제 서비스 메인 애플리케이션
//!
//! Actix-web 기반 HTTP 서버를 구동합니다. 결제 서비스는 자체 영속 상태가
//! 없으며(멱등성은 게이트웨이에 위임), 주문 서비스/볼트/게이트웨이/알림
//! 핸들을 명시적으로 구성하여 주입합니다.

use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{App, HttpServer, middleware, web};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use identity_payment_backend::clients::{
    HttpNotifier, HttpOrderClient, HttpSecretVault, MetricsSink, Notifier, OrderClient,
    PaymentGateway, SecretVault, StripeGateway,
};
use identity_payment_backend::config::{
    GatewayConfig, NotifierConfig, OrderServiceConfig, PaymentServerConfig, VaultConfig,
};
use identity_payment_backend::routes::configure_payment_routes;
use identity_payment_backend::services::PaymentService;

/// Rate Limiting 설정 구조체
#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();
    load_env_file();

    info!("🚀 결제 서비스 시작중...");

    // 협력 서비스 핸들 구성 (명시적 주입 — 전역 싱글톤 없음)
    let vault: Arc<dyn SecretVault> = Arc::new(HttpSecretVault::new(VaultConfig::base_url()));
    let gateway_api_key = vault
        .get_secret(&GatewayConfig::stripe_secret_name())
        .await
        .expect("게이트웨이 API 키 조회 실패");

    let orders: Arc<dyn OrderClient> =
        Arc::new(HttpOrderClient::new(OrderServiceConfig::base_url()));
    let gateway: Arc<dyn PaymentGateway> = Arc::new(StripeGateway::new(
        GatewayConfig::stripe_base_url(),
        gateway_api_key,
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new(
        NotifierConfig::url(),
        NotifierConfig::timeout(),
    ));
    let metrics = Arc::new(MetricsSink::from_env());

    let payments = Arc::new(PaymentService::new(
        orders,
        vault,
        gateway,
        notifier,
        metrics,
    ));

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server(payments).await
}

/// HTTP 서버를 구성하고 실행합니다
async fn start_http_server(payments: Arc<PaymentService>) -> std::io::Result<()> {
    let bind_address = PaymentServerConfig::bind_address();

    info!("🌐 서버가 http://{} 에서 실행중입니다", bind_address);
    info!("📍 Health check: http://{}/health", bind_address);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .unwrap();

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second, rate_limit_config.burst_size
    );

    HttpServer::new(move || {
        let cors = configure_cors();

        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .app_data(web::Data::from(payments.clone()))
            .configure(configure_payment_routes)
    })
    .bind(bind_address)?
    .workers(4)
    .run()
    .await
}

/// 환경별 설정 파일을 로드합니다
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// CORS 설정을 구성합니다
fn configure_cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}

/// 환경변수에서 Rate Limiting 설정을 로드합니다
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
            200
        });

    let config = RateLimitConfig {
        per_second,
        burst_size,
    };

    info!("Rate Limiting 설정 로드됨: {:?}", config);
    config
}

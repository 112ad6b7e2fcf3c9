//! Web 服务器主程序入口

use atelier::web::{WebConfig, WebServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载 .env（不存在时静默忽略）
    dotenv::dotenv().ok();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("atelier=info")),
        )
        .init();

    // 解析命令行参数
    let args: Vec<String> = std::env::args().collect();

    let mut bind_addr: Option<String> = None;
    let mut port: Option<u16> = None;

    // 简单的命令行参数解析
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" | "-b" => {
                if i + 1 < args.len() {
                    bind_addr = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --bind requires an address");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = Some(args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: Invalid port number");
                        std::process::exit(1);
                    }));
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a port number");
                    std::process::exit(1);
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("Error: Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 环境配置打底，命令行参数覆盖
    let mut web_config = WebConfig::from_env()?;
    if let Some(bind_addr) = bind_addr {
        web_config.bind_addr = bind_addr;
    }
    if let Some(port) = port {
        web_config.port = port;
    }

    // 启动 Web 服务器
    let server = WebServer::new(web_config);
    server.start().await?;

    Ok(())
}

fn print_help() {
    println!("Atelier Web Server");
    println!();
    println!("USAGE:");
    println!("    atelier-web [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -b, --bind <ADDRESS>     Bind address [default: 127.0.0.1]");
    println!("    -p, --port <PORT>        Port number [default: 7080]");
    println!("    -h, --help               Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    atelier-web");
    println!("    atelier-web --bind 0.0.0.0 --port 3000");
}

//! Xiangqi Pozhen CLI
//!
//! 命令行界面，用于调试走法生成和最佳落点推荐
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令
//! 2. Server 模式：长驻进程，持有一个对局会话，通过 stdin/stdout 通信

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use xiangqi_pozhen::{
    parse_layout, render_ascii, test_positions, AbilityState, AdvisorConfig, Board,
    CandidateEval, EliminationReport, GameSession, MoveAdvisor, Position, RandomOpponent,
    SessionSnapshot, Side,
};

#[derive(Parser)]
#[command(name = "pozhen")]
#[command(about = "Xiangqi lone-rook puzzle engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取可走位置
    Moves {
        /// 布局记号或局面名（如 KING_1）
        #[arg(long, default_value = test_positions::START)]
        layout: String,

        /// 起点（如 d6）；省略时列出行棋方全部走法
        #[arg(long)]
        from: Option<String>,
    },

    /// 推荐红车的最佳落点
    Best {
        /// 布局记号或局面名
        #[arg(long, default_value = test_positions::START)]
        layout: String,

        /// 红车位置；省略时自动查找
        #[arg(long)]
        from: Option<String>,

        /// 按已充能计算
        #[arg(long)]
        charged: bool,

        /// 推荐器配置 (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 自动对弈：红车按推荐走，黑方随机走
    Play {
        /// 布局记号或局面名
        #[arg(long, default_value = test_positions::START)]
        layout: String,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// 最多走多少步
        #[arg(long, default_value = "20")]
        turns: usize,

        /// 推荐器配置 (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// 列出内置局面
    Positions,

    /// 启动 server 模式（stdin/stdout 通信）
    Server {
        /// 推荐器配置 (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct BestResponse {
    from: String,
    best: Option<String>,
    fallback: bool,
    candidates: Vec<CandidateEval>,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    layout: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
}

#[derive(Serialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    legal_moves: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    best: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<Vec<CandidateEval>>,
    // eliminate 命令的字段
    #[serde(skip_serializing_if = "Option::is_none")]
    eliminated: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chained: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<SessionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn success_state(session: &GameSession) -> Self {
        Self {
            ok: true,
            state: Some(session.snapshot()),
            ..Default::default()
        }
    }

    fn success_legal_moves(legal_moves: Vec<String>) -> Self {
        Self {
            ok: true,
            legal_moves: Some(legal_moves),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Moves { layout, from } => run_moves(&layout, from.as_deref()),
        Commands::Best {
            layout,
            from,
            charged,
            config,
            json,
        } => run_best(&layout, from.as_deref(), charged, config.as_deref(), json),
        Commands::Play {
            layout,
            seed,
            turns,
            config,
        } => run_play(&layout, seed, turns, config.as_deref()),
        Commands::Positions => {
            for (name, layout) in test_positions::ALL_POSITIONS.iter() {
                println!("{:<12} {}", name, layout);
            }
            Ok(())
        }
        Commands::Server { config } => load_config(config.as_deref()).map(run_server),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// 局面名或布局记号
fn resolve_layout(arg: &str) -> Result<Board, String> {
    let layout = test_positions::by_name(arg).unwrap_or(arg);
    parse_layout(layout)
}

fn parse_square(s: &str) -> Result<Position, String> {
    Position::from_notation(s).ok_or_else(|| format!("Invalid square: {}", s))
}

fn load_config(path: Option<&Path>) -> Result<AdvisorConfig, String> {
    match path {
        Some(p) => AdvisorConfig::from_json_file(p),
        None => Ok(AdvisorConfig::default()),
    }
}

fn to_json_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"serialize: {}\"}}", e))
}

fn run_moves(layout: &str, from: Option<&str>) -> Result<(), String> {
    let board = resolve_layout(layout)?;

    let moves: Vec<(Position, Position)> = match from {
        Some(sq) => {
            let from = parse_square(sq)?;
            let piece = board
                .piece_at(from)
                .ok_or_else(|| format!("No piece at {}", from))?;
            board.valid_moves(piece).into_iter().map(|to| (from, to)).collect()
        }
        None => board.legal_moves_for(board.side_to_move()),
    };

    println!("Valid moves ({}):", moves.len());
    for (from, to) in &moves {
        println!("  {}{}", from, to);
    }
    Ok(())
}

fn run_best(
    layout: &str,
    from: Option<&str>,
    charged: bool,
    config: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let board = resolve_layout(layout)?;
    let advisor = MoveAdvisor::new(load_config(config)?);

    let from = match from {
        Some(sq) => parse_square(sq)?,
        None => board
            .find_controlled_rook()
            .ok_or_else(|| "No red rook on the board".to_string())?,
    };
    let piece = board
        .piece_at(from)
        .ok_or_else(|| format!("No piece at {}", from))?;

    let ability = if charged {
        AbilityState::charged()
    } else {
        AbilityState::new()
    };
    let moves = board.valid_moves(piece);
    let rec = advisor.analyze(&board, &ability, piece, &moves);

    if json {
        let response = BestResponse {
            from: from.to_string(),
            best: rec.best_position().map(|p| p.to_string()),
            fallback: rec.fallback,
            candidates: rec.candidates,
        };
        let out = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }

    print!("{}", render_ascii(&board));
    match rec.best_position() {
        Some(best) => println!("\nBest move for {}: {}", from, best),
        None => println!("\nNo recommendation for {}", from),
    }
    if rec.fallback {
        println!("(no safe square, ranked all candidates)");
    }
    for i in rec.ranked() {
        let c = &rec.candidates[i];
        let attackers: Vec<String> = c.attackers.iter().map(|p| p.to_string()).collect();
        println!(
            "  {} {:<8} safe={:<5} score={:.2}{}{}",
            c.to,
            c.capture.map(|k| format!("x{:?}", k)).unwrap_or_default(),
            c.safe,
            c.score,
            if c.rescued_by_elimination { " (cross)" } else { "" },
            if attackers.is_empty() {
                String::new()
            } else {
                format!(" attacked by {}", attackers.join(","))
            }
        );
    }
    Ok(())
}

fn run_play(layout: &str, seed: Option<u64>, turns: usize, config: Option<&Path>) -> Result<(), String> {
    let board = resolve_layout(layout)?;
    let mut session = GameSession::from_board(board, load_config(config)?);
    let mut opponent = RandomOpponent::new(seed);

    print!("{}", render_ascii(session.board()));
    for turn in 1..=turns {
        if session.status().is_over() {
            break;
        }

        let side = session.side_to_move();
        let (from, to) = match side {
            Side::Red => {
                let rook = match session.board().find_controlled_rook() {
                    Some(p) => p,
                    None => break,
                };
                let target = session
                    .recommend(rook)
                    .and_then(|i| session.valid_moves(rook).get(i).copied());
                match target {
                    Some(to) => (rook, to),
                    None => break,
                }
            }
            Side::Black => match opponent.pick_move(session.board()) {
                Some(mv) => mv,
                None => break,
            },
        };

        if !session.attempt_move(from, to) {
            return Err(format!("Move {}{} rejected", from, to));
        }
        println!("\n{}. {} {} -> {}", turn, side, from, to);

        if let Some(report) = session.execute_pending_elimination() {
            print_elimination(&report);
        }
        print!("{}", render_ascii(session.board()));
    }

    let snapshot = session.snapshot();
    println!(
        "\nStatus: {}, ability: {}, layout: {}",
        snapshot.status, snapshot.ability, snapshot.layout
    );
    Ok(())
}

fn print_elimination(report: &EliminationReport) {
    let removed: Vec<String> = report
        .removed
        .iter()
        .map(|p| format!("{:?}@{}", p.kind, p.position))
        .collect();
    println!(
        "Cross elimination at {}: {}{}",
        report.origin,
        removed.join(", "),
        if report.chained { " (recharged)" } else { "" }
    );
}

/// Server 模式主循环
/// 从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout
fn run_server(config: AdvisorConfig) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut session = GameSession::with_config(config);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", to_json_line(&response));
                let _ = stdout.flush();
                continue;
            }
        };

        let response = match request.cmd.as_str() {
            "quit" => break,
            cmd => handle_request(&mut session, cmd, &request)
                .unwrap_or_else(|e| ServerResponse::error(&e)),
        };

        println!("{}", to_json_line(&response));
        let _ = stdout.flush();
    }
}

fn handle_request(
    session: &mut GameSession,
    cmd: &str,
    request: &ServerRequest,
) -> Result<ServerResponse, String> {
    let square = |field: &Option<String>, name: &str| -> Result<Position, String> {
        field
            .as_deref()
            .ok_or_else(|| format!("Missing field: {}", name))
            .and_then(parse_square)
    };

    match cmd {
        "status" => Ok(ServerResponse::success_state(session)),
        "new" => {
            session.new_game();
            Ok(ServerResponse::success_state(session))
        }
        "load" => {
            let layout = request
                .layout
                .as_deref()
                .ok_or_else(|| "Missing field: layout".to_string())?;
            let board = resolve_layout(layout)?;
            *session = GameSession::from_board(board, session.advisor().config().clone());
            Ok(ServerResponse::success_state(session))
        }
        "moves" => {
            let from = square(&request.from, "from")?;
            let moves = session
                .valid_moves(from)
                .into_iter()
                .map(|p| p.to_string())
                .collect();
            Ok(ServerResponse::success_legal_moves(moves))
        }
        "best" => {
            let from = square(&request.from, "from")?;
            let rec = session
                .analyze(from)
                .ok_or_else(|| format!("No piece at {}", from))?;
            Ok(ServerResponse {
                ok: true,
                best: rec.best_position().map(|p| p.to_string()),
                fallback: Some(rec.fallback),
                candidates: Some(rec.candidates),
                ..Default::default()
            })
        }
        "move" => {
            let from = square(&request.from, "from")?;
            let to = square(&request.to, "to")?;
            if !session.attempt_move(from, to) {
                return Err(format!("Illegal move: {}{}", from, to));
            }
            Ok(ServerResponse::success_state(session))
        }
        "eliminate" => {
            let report = session
                .execute_pending_elimination()
                .ok_or_else(|| "No elimination pending".to_string())?;
            Ok(ServerResponse {
                ok: true,
                eliminated: Some(report.removed.iter().map(|p| p.position.to_string()).collect()),
                chained: Some(report.chained),
                state: Some(session.snapshot()),
                ..Default::default()
            })
        }
        "undo" => {
            if !session.undo_last_move() {
                return Err("Nothing to undo".to_string());
            }
            Ok(ServerResponse::success_state(session))
        }
        _ => Err(format!("Unknown command: {}", cmd)),
    }
}

use std::collections::HashMap;

use colored::{Color, ColoredString, Colorize};
use crossterm::terminal;

use crate::testing::{JudgeCode, TestOutcome};

#[macro_export]
macro_rules! print_success {
    ($fmt:literal, $($e:tt)*) => {
        use ::colored::Colorize as _;
        println!("{}", format!($fmt, $($e)*).green())
    }
}

pub fn is_truecolor_supported() -> bool {
    let Ok(v) = std::env::var("COLORTERM") else {
        return false
    };
    matches!(v.as_str(), "truecolor" | "24bit")
}

pub trait ColorTheme {
    fn color(&self) -> Color;
}

impl ColorTheme for log::Level {
    fn color(&self) -> Color {
        use log::Level::*;
        match self {
            Error => Color::BrightRed,
            Warn => Color::BrightYellow,
            Info => Color::Cyan,
            Debug => Color::Magenta,
            Trace => Color::Blue,
        }
    }
}

impl ColorTheme for JudgeCode {
    fn color(&self) -> Color {
        use JudgeCode::*;
        if !self::is_truecolor_supported() {
            return match self {
                AC => Color::Green,
                WA => Color::Yellow,
                TLE => Color::Red,
                RE => Color::Magenta,
                JF => Color::Blue,
            };
        }

        match self {
            AC => Color::TrueColor {
                r: 30,
                g: 180,
                b: 40,
            },
            WA => Color::TrueColor {
                r: 210,
                g: 138,
                b: 4,
            },
            TLE => Color::TrueColor {
                r: 220,
                g: 42,
                b: 42,
            },
            RE => Color::TrueColor {
                r: 171,
                g: 40,
                b: 200,
            },
            JF => Color::TrueColor {
                r: 60,
                g: 90,
                b: 220,
            },
        }
    }
}

pub fn judge_icon(judge: JudgeCode) -> ColoredString {
    let fg = if is_truecolor_supported() {
        Color::TrueColor {
            r: 255,
            g: 255,
            b: 255,
        }
    } else {
        Color::BrightBlack
    };
    format!(" {} ", judge)
        .on_color(judge.color())
        .bold()
        .color(fg)
}

pub fn print_test_result_summary(results: &[TestOutcome]) {
    let bar = "-".repeat(5);
    print!("{} ", bar);

    let count: HashMap<JudgeCode, usize> = results.iter().fold(HashMap::new(), |mut count, r| {
        *count.entry(r.judge).or_default() += 1;
        count
    });

    let num_total_test = results.len();
    let num_passed = *count.get(&JudgeCode::AC).unwrap_or(&0);
    let num_failed = num_total_test - num_passed;

    if num_passed == num_total_test {
        let msg = format!("All {} tests passed ✨", num_total_test);
        print!("{}", msg.green());
    } else {
        let summary_msg = if num_passed > 0 {
            format!("{}/{} tests failed 💣", num_failed, num_total_test)
        } else {
            format!("All {} tests failed 💀", num_total_test)
        };

        let mut failed: Vec<_> = count
            .iter()
            .filter(|(&judge, _)| judge != JudgeCode::AC)
            .collect();
        failed.sort_by_key(|(judge, _)| judge.to_string());

        let detail_msg = failed
            .into_iter()
            .map(|(&judge, &cnt)| {
                format!(
                    "{}{}{}",
                    self::judge_icon(judge),
                    "x".dimmed(),
                    cnt.to_string().bold().bright_white(),
                )
            })
            .collect::<Vec<String>>()
            .join(", ");

        print!("{} ({})", summary_msg.bright_red(), detail_msg);
    }

    println!(" {}", bar);
}

pub fn print_test_result_detail(res: &TestOutcome) {
    let (cols, _) = terminal::size().unwrap_or((40, 40));
    let cols = cols.max(24) as usize;

    const BOLD_LINE: &str = "━";
    const THIN_LINE: &str = "─";

    let bold_bar = BOLD_LINE.repeat(cols).blue().bold();

    let score = res
        .score
        .map(|s| format!(" {}/{}", s.matches, s.total))
        .unwrap_or_default();
    println!(
        "\n{}: {}{} [{}ms]\n{}",
        res.testcase_name.color(Color::BrightYellow).bold(),
        self::judge_icon(res.judge),
        score,
        res.execution_time.as_millis(),
        bold_bar,
    );

    fn print_sub_title(s: &str, cols: usize) {
        println!(
            "{}{}",
            s.cyan().bold(),
            THIN_LINE.repeat(cols.saturating_sub(s.len() + 1)).bright_black(),
        )
    }

    fn print_lines(entire_str: &str) {
        let lines: Vec<_> = entire_str.lines().collect();
        if lines.is_empty() {
            println!("{}", "<EMPTY>".magenta().dimmed());
            return;
        }
        for (i, line) in lines.iter().enumerate() {
            let trimmed = line.trim_end();
            print!("{}", trimmed);

            let num_trailling_whitespace = line.len() - trimmed.len();
            if num_trailling_whitespace > 0 {
                print!(
                    "{}{}",
                    " ".repeat(num_trailling_whitespace).on_red(),
                    "(Trailling whitespace)".bright_red().bold()
                );
            }

            let is_last_line = i + 1 == lines.len();
            if is_last_line && !entire_str.ends_with('\n') {
                print!("{}", " Missing new line ".on_yellow().black().bold());
            }

            println!();
        }
    }

    print_sub_title("[judge-answer]", cols);
    print_lines(&res.groundtruth);

    match &res.output {
        Some(output) => {
            print_sub_title("[stdout]", cols);
            print_lines(&output.stdout);

            if !output.stderr.is_empty() {
                print_sub_title("[stderr]", cols);
                print!("{}", output.stderr);
            }
        }
        None => println!("{}", "<NO OUTPUT: process was killed>".magenta().dimmed()),
    }

    println!("{}", bold_bar);
}

//! 诊断渲染器

use owo_colors::OwoColorize;

use crate::util::diagnostic::Diagnostic;
use crate::util::span::SourceFile;

/// 渲染器配置
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// 是否启用颜色输出
    pub use_colors: bool,
    /// 是否显示源码片段
    pub show_source: bool,
    /// 是否显示帮助信息
    pub show_help: bool,
    /// 指示字符 (默认: "^")
    pub indicator: char,
    /// 最大显示行数
    pub max_lines: usize,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_source: true,
            show_help: true,
            indicator: '^',
            max_lines: 6,
        }
    }
}

/// 文本诊断渲染器
#[derive(Debug, Clone, Default)]
pub struct TextEmitter {
    config: EmitterConfig,
}

impl TextEmitter {
    /// 创建新的文本渲染器
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义配置创建渲染器
    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// 渲染单个诊断
    pub fn render(
        &self,
        diagnostic: &Diagnostic,
    ) -> String {
        self.render_with_source(diagnostic, None)
    }

    /// 渲染诊断到指定源码文件
    pub fn render_with_source(
        &self,
        diagnostic: &Diagnostic,
        source_file: Option<&SourceFile>,
    ) -> String {
        let mut output = String::new();

        // 1. 头部
        output.push_str(&self.render_header(diagnostic));

        // 2. 位置
        output.push_str(&self.render_location(diagnostic, source_file));

        // 3. 源码片段
        if self.config.show_source {
            if let Some(snippet) = self.render_source_snippet(diagnostic, source_file) {
                output.push_str(&snippet);
            }
        }

        // 4. 帮助信息
        if self.config.show_help && !diagnostic.help.is_empty() {
            output.push_str(&self.paint_help("help"));
            output.push_str(": ");
            output.push_str(&diagnostic.help);
            output.push('\n');
        }

        output
    }

    fn render_header(
        &self,
        diagnostic: &Diagnostic,
    ) -> String {
        let label = if self.config.use_colors {
            "error".red().bold().to_string()
        } else {
            "error".to_string()
        };
        let code = if self.config.use_colors {
            diagnostic.code.bold().to_string()
        } else {
            diagnostic.code.clone()
        };
        format!("{}[{}]: {}\n", label, code, diagnostic.message)
    }

    fn render_location(
        &self,
        diagnostic: &Diagnostic,
        source_file: Option<&SourceFile>,
    ) -> String {
        match &diagnostic.span {
            Some(span) if !span.is_dummy() => {
                let file_name = source_file
                    .map(|sf| sf.name.as_str())
                    .unwrap_or("<unknown>");
                format!(
                    " --> {}:{}:{}\n",
                    file_name, span.start.line, span.start.column
                )
            }
            _ => String::new(),
        }
    }

    fn render_source_snippet(
        &self,
        diagnostic: &Diagnostic,
        source_file: Option<&SourceFile>,
    ) -> Option<String> {
        let span = diagnostic.span.as_ref()?;
        if span.is_dummy() {
            return None;
        }

        let source_file = source_file?;
        let start_line = span.start.line;
        let end_line = span.end.line.max(start_line);

        // 限制显示行数
        let lines_to_show = (end_line - start_line + 1).min(self.config.max_lines);
        let mut output = String::new();

        for i in 0..lines_to_show {
            let line_num = start_line + i;
            let Some(line) = source_file.line_text(line_num) else {
                break;
            };
            output.push_str(&format!("{:>4} | {}\n", line_num, line));

            // 第一行下方加指示符
            if i == 0 {
                let spaces = " ".repeat(span.start.column.saturating_sub(1));
                let indicator_len = if start_line == span.end.line {
                    span.end.column.saturating_sub(span.start.column).max(1)
                } else {
                    line.len().saturating_sub(span.start.column.saturating_sub(1)).max(1)
                };
                let indicators = self.config.indicator.to_string().repeat(indicator_len);
                let indicators = if self.config.use_colors {
                    indicators.red().to_string()
                } else {
                    indicators
                };
                output.push_str(&format!("     | {}{}\n", spaces, indicators));
            }
        }

        Some(output)
    }

    fn paint_help(
        &self,
        text: &str,
    ) -> String {
        if self.config.use_colors {
            text.cyan().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

// ABOUTME: Compiled text templates for item titles, descriptions and filters.
// ABOUTME: Supports a Go text/template subset: field access, pipelines, functions and if/else blocks.

//! Text templates rendered against a [`FieldMap`].
//!
//! Syntax:
//! - `{{ .Name }}` raw text of a field; `.Name.Text`, `.Name.Html`,
//!   `.Name.Attr "href"`, `.Name.AttrOr "href" "#"`
//! - string literals, `true`, `false`, parenthesized pipelines
//! - functions `trim lower upper not eq ne contains and or print`
//! - pipelines `{{ .Name.Text | trim | lower }}` (value passed as last argument)
//! - `{{ if X }}..{{ else if Y }}..{{ else }}..{{ end }}`
//! - trim markers `{{-`/`-}}` and comments `{{/* .. */}}`
//!
//! Templates are compiled once and rendering never fails: a field that is
//! not defined renders as empty text.

use std::fmt;

use tracing::debug;

use crate::error::TemplateError;
use crate::selector::{FieldMap, FieldRef};

/// A compiled template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parses `source`. `name` identifies the template in diagnostics.
    pub fn compile(name: &str, source: &str) -> Result<Self, TemplateError> {
        let segments = split_segments(source)?;
        let nodes = build_tree(segments)?;
        Ok(Self {
            name: name.to_string(),
            nodes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of every field the template reads, in order of appearance.
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_nodes(&self.nodes, &mut names);
        names
    }

    /// Renders the template against the fields of one item.
    pub fn render(&self, fields: &FieldMap<'_>) -> String {
        let mut out = String::new();
        let ctx = Context {
            template: &self.name,
            fields,
        };
        ctx.render_nodes(&self.nodes, &mut out);
        out
    }
}

// ----------------------------------------------------------------------------
// Syntax tree
// ----------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Node {
    Text(String),
    Action(Pipeline),
    If {
        branches: Vec<(Pipeline, Vec<Node>)>,
        otherwise: Vec<Node>,
    },
}

#[derive(Debug, Clone)]
struct Pipeline {
    commands: Vec<Command>,
}

#[derive(Debug, Clone)]
enum Command {
    Operand(Operand),
    Call(Func, Vec<Operand>),
}

#[derive(Debug, Clone)]
enum Operand {
    Str(String),
    Bool(bool),
    Field(FieldExpr),
    Pipeline(Box<Pipeline>),
}

#[derive(Debug, Clone)]
struct FieldExpr {
    name: String,
    access: Access,
}

#[derive(Debug, Clone)]
enum Access {
    Value,
    Text,
    Html,
    Attr(Box<Operand>),
    AttrOr(Box<Operand>, Box<Operand>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Func {
    Trim,
    Lower,
    Upper,
    Not,
    Eq,
    Ne,
    Contains,
    And,
    Or,
    Print,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        let func = match name {
            "trim" => Func::Trim,
            "lower" => Func::Lower,
            "upper" => Func::Upper,
            "not" => Func::Not,
            "eq" => Func::Eq,
            "ne" => Func::Ne,
            "contains" => Func::Contains,
            "and" => Func::And,
            "or" => Func::Or,
            "print" => Func::Print,
            _ => return None,
        };
        Some(func)
    }

    /// Accepted argument counts (min, max).
    fn arity(self) -> (usize, usize) {
        match self {
            Func::Trim | Func::Lower | Func::Upper | Func::Not => (1, 1),
            Func::Eq | Func::Ne | Func::Contains => (2, 2),
            Func::And | Func::Or => (1, usize::MAX),
            Func::Print => (0, usize::MAX),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Func::Trim => "trim",
            Func::Lower => "lower",
            Func::Upper => "upper",
            Func::Not => "not",
            Func::Eq => "eq",
            Func::Ne => "ne",
            Func::Contains => "contains",
            Func::And => "and",
            Func::Or => "or",
            Func::Print => "print",
        };
        write!(f, "{}", s)
    }
}

// ----------------------------------------------------------------------------
// Lexing
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Field(Vec<String>),
    Ident(String),
    Str(String),
    Pipe,
    LParen,
    RParen,
}

enum Segment {
    Text(String),
    Action { offset: usize, tokens: Vec<Token> },
}

struct LexedAction {
    tokens: Vec<Token>,
    end: usize,
    trim_right: bool,
    comment: bool,
}

/// Splits the source into literal text and lexed actions, applying trim markers.
fn split_segments(source: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    loop {
        let Some(found) = source[pos..].find("{{") else {
            let mut text = &source[pos..];
            if trim_next {
                text = text.trim_start();
            }
            if !text.is_empty() {
                segments.push(Segment::Text(text.to_string()));
            }
            return Ok(segments);
        };

        let open = pos + found;
        let mut text = &source[pos..open];
        if trim_next {
            text = text.trim_start();
        }

        let mut cursor = open + 2;
        let after = &source[cursor..];
        if after.starts_with('-') && after[1..].starts_with(char::is_whitespace) {
            text = text.trim_end();
            cursor += 1;
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text.to_string()));
        }

        let action = lex_action(source, open, cursor)?;
        if !action.comment {
            segments.push(Segment::Action {
                offset: open,
                tokens: action.tokens,
            });
        }
        pos = action.end;
        trim_next = action.trim_right;
    }
}

fn lex_action(source: &str, open: usize, start: usize) -> Result<LexedAction, TemplateError> {
    let mut tokens = Vec::new();
    let mut comment = false;
    let mut i = start;

    loop {
        let rest = &source[i..];
        let trimmed = rest.trim_start();
        let skipped = rest.len() - trimmed.len();
        i += skipped;

        if trimmed.is_empty() {
            return Err(TemplateError::new(open, "unclosed action"));
        }
        if trimmed.starts_with("}}") {
            return Ok(LexedAction {
                tokens,
                end: i + 2,
                trim_right: false,
                comment,
            });
        }
        if trimmed.starts_with("-}}") && skipped > 0 {
            return Ok(LexedAction {
                tokens,
                end: i + 3,
                trim_right: true,
                comment,
            });
        }
        if trimmed.starts_with("/*") && tokens.is_empty() && !comment {
            let close = trimmed
                .find("*/")
                .ok_or_else(|| TemplateError::new(i, "unclosed comment"))?;
            i += close + 2;
            comment = true;
            continue;
        }
        if comment {
            return Err(TemplateError::new(i, "comment must be the whole action"));
        }

        let c = trimmed.chars().next().unwrap_or_default();
        match c {
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '"' => {
                let (value, len) = lex_string(trimmed, i)?;
                tokens.push(Token::Str(value));
                i += len;
            }
            '.' => {
                let (path, len) = lex_field(trimmed, i)?;
                tokens.push(Token::Field(path));
                i += len;
            }
            c if is_ident_char(c) => {
                let len = trimmed
                    .find(|ch: char| !is_ident_char(ch))
                    .unwrap_or(trimmed.len());
                tokens.push(Token::Ident(trimmed[..len].to_string()));
                i += len;
            }
            other => {
                return Err(TemplateError::new(
                    i,
                    format!("unexpected character {:?} in action", other),
                ))
            }
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lexes a `"..."` literal; returns the unescaped value and the consumed length.
fn lex_string(input: &str, offset: usize) -> Result<(String, usize), TemplateError> {
    let mut value = String::new();
    let mut chars = input.char_indices().skip(1);
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((value, idx + 1)),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((idx, other)) => {
                    return Err(TemplateError::new(
                        offset + idx,
                        format!("unknown escape \\{}", other),
                    ))
                }
                None => break,
            },
            c => value.push(c),
        }
    }
    Err(TemplateError::new(offset, "unterminated string"))
}

/// Lexes `.A.B`; returns the segments and the consumed length.
fn lex_field(input: &str, offset: usize) -> Result<(Vec<String>, usize), TemplateError> {
    let mut path = Vec::new();
    let mut len = 0;
    while input[len..].starts_with('.') {
        let name_start = len + 1;
        let name_len = input[name_start..]
            .find(|ch: char| !is_ident_char(ch))
            .unwrap_or(input.len() - name_start);
        if name_len == 0 {
            return Err(TemplateError::new(
                offset + len,
                "expected a field name after '.'",
            ));
        }
        path.push(input[name_start..name_start + name_len].to_string());
        len = name_start + name_len;
    }
    Ok((path, len))
}

// ----------------------------------------------------------------------------
// Parsing
// ----------------------------------------------------------------------------

enum Statement {
    Pipeline(Pipeline),
    If(Pipeline),
    ElseIf(Pipeline),
    Else,
    End,
}

struct Frame {
    offset: usize,
    done: Vec<(Pipeline, Vec<Node>)>,
    cond: Option<Pipeline>,
    body: Vec<Node>,
}

impl Frame {
    fn finish(mut self) -> Node {
        let otherwise = match self.cond.take() {
            Some(cond) => {
                self.done.push((cond, self.body));
                Vec::new()
            }
            None => self.body,
        };
        Node::If {
            branches: self.done,
            otherwise,
        }
    }
}

fn target<'t>(root: &'t mut Vec<Node>, stack: &'t mut [Frame]) -> &'t mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.body,
        None => root,
    }
}

fn build_tree(segments: Vec<Segment>) -> Result<Vec<Node>, TemplateError> {
    let mut root = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for segment in segments {
        let (offset, tokens) = match segment {
            Segment::Text(text) => {
                target(&mut root, &mut stack).push(Node::Text(text));
                continue;
            }
            Segment::Action { offset, tokens } => (offset, tokens),
        };

        match parse_statement(&tokens, offset)? {
            Statement::Pipeline(pipeline) => {
                target(&mut root, &mut stack).push(Node::Action(pipeline));
            }
            Statement::If(cond) => stack.push(Frame {
                offset,
                done: Vec::new(),
                cond: Some(cond),
                body: Vec::new(),
            }),
            Statement::ElseIf(cond) => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| TemplateError::new(offset, "else without if"))?;
                let previous = frame
                    .cond
                    .take()
                    .ok_or_else(|| TemplateError::new(offset, "else if after else"))?;
                let body = std::mem::take(&mut frame.body);
                frame.done.push((previous, body));
                frame.cond = Some(cond);
            }
            Statement::Else => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| TemplateError::new(offset, "else without if"))?;
                let previous = frame
                    .cond
                    .take()
                    .ok_or_else(|| TemplateError::new(offset, "duplicate else"))?;
                let body = std::mem::take(&mut frame.body);
                frame.done.push((previous, body));
            }
            Statement::End => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| TemplateError::new(offset, "end without if"))?;
                let node = frame.finish();
                target(&mut root, &mut stack).push(node);
            }
        }
    }

    match stack.last() {
        Some(frame) => Err(TemplateError::new(frame.offset, "if without end")),
        None => Ok(root),
    }
}

fn parse_statement(tokens: &[Token], offset: usize) -> Result<Statement, TemplateError> {
    match tokens {
        [] => Err(TemplateError::new(offset, "empty action")),
        [Token::Ident(kw), rest @ ..] if kw == "if" => {
            Ok(Statement::If(parse_pipeline(rest, offset)?))
        }
        [Token::Ident(kw), Token::Ident(kw2), rest @ ..] if kw == "else" && kw2 == "if" => {
            Ok(Statement::ElseIf(parse_pipeline(rest, offset)?))
        }
        [Token::Ident(kw)] if kw == "else" => Ok(Statement::Else),
        [Token::Ident(kw)] if kw == "end" => Ok(Statement::End),
        [Token::Ident(kw), ..] if kw == "else" || kw == "end" => Err(TemplateError::new(
            offset,
            format!("unexpected tokens after {}", kw),
        )),
        _ => Ok(Statement::Pipeline(parse_pipeline(tokens, offset)?)),
    }
}

fn parse_pipeline(tokens: &[Token], offset: usize) -> Result<Pipeline, TemplateError> {
    let mut commands = Vec::new();
    for (idx, part) in split_top_level(tokens, offset)?.into_iter().enumerate() {
        commands.push(parse_command(part, idx > 0, offset)?);
    }
    Ok(Pipeline { commands })
}

/// Splits a token list on `|` outside parentheses.
fn split_top_level(tokens: &[Token], offset: usize) -> Result<Vec<&[Token]>, TemplateError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| TemplateError::new(offset, "unexpected ')'"))?;
            }
            Token::Pipe if depth == 0 => {
                parts.push(&tokens[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(TemplateError::new(offset, "unclosed '('"));
    }
    parts.push(&tokens[start..]);
    Ok(parts)
}

fn parse_command(tokens: &[Token], piped: bool, offset: usize) -> Result<Command, TemplateError> {
    let Some((first, rest)) = tokens.split_first() else {
        return Err(TemplateError::new(offset, "missing command in pipeline"));
    };

    match first {
        Token::Ident(name) if name == "true" || name == "false" => {
            if piped || !rest.is_empty() {
                return Err(TemplateError::new(offset, "a literal cannot take arguments"));
            }
            Ok(Command::Operand(Operand::Bool(name == "true")))
        }
        Token::Ident(name) => {
            let func = Func::lookup(name)
                .ok_or_else(|| TemplateError::new(offset, format!("unknown function {:?}", name)))?;
            let args = parse_operands(rest, offset)?;
            let count = args.len() + usize::from(piped);
            let (min, max) = func.arity();
            if count < min || count > max {
                return Err(TemplateError::new(
                    offset,
                    format!("wrong number of arguments for {}: got {}", func, count),
                ));
            }
            Ok(Command::Call(func, args))
        }
        Token::Field(path) => {
            if piped {
                return Err(TemplateError::new(
                    offset,
                    "a field cannot receive a piped value",
                ));
            }
            let args = parse_operands(rest, offset)?;
            Ok(Command::Operand(Operand::Field(field_expr(path, args, offset)?)))
        }
        _ => {
            if piped {
                return Err(TemplateError::new(
                    offset,
                    "only functions can receive a piped value",
                ));
            }
            let mut operands = parse_operands(tokens, offset)?;
            match (operands.pop(), operands.is_empty()) {
                (Some(operand), true) => Ok(Command::Operand(operand)),
                _ => Err(TemplateError::new(offset, "a literal cannot take arguments")),
            }
        }
    }
}

fn parse_operands(tokens: &[Token], offset: usize) -> Result<Vec<Operand>, TemplateError> {
    let mut operands = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() {
        match &tokens[idx] {
            Token::Str(s) => operands.push(Operand::Str(s.clone())),
            Token::Ident(name) if name == "true" || name == "false" => {
                operands.push(Operand::Bool(name == "true"))
            }
            Token::Ident(name) => {
                return Err(TemplateError::new(
                    offset,
                    format!("function {:?} used as an argument must be parenthesized", name),
                ))
            }
            Token::Field(path) => {
                operands.push(Operand::Field(field_expr(path, Vec::new(), offset)?))
            }
            Token::LParen => {
                let close = matching_paren(tokens, idx)
                    .ok_or_else(|| TemplateError::new(offset, "unclosed '('"))?;
                let inner = parse_pipeline(&tokens[idx + 1..close], offset)?;
                operands.push(Operand::Pipeline(Box::new(inner)));
                idx = close;
            }
            Token::RParen => return Err(TemplateError::new(offset, "unexpected ')'")),
            Token::Pipe => return Err(TemplateError::new(offset, "unexpected '|'")),
        }
        idx += 1;
    }
    Ok(operands)
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn field_expr(path: &[String], args: Vec<Operand>, offset: usize) -> Result<FieldExpr, TemplateError> {
    let (name, method) = match path {
        [name] => (name, None),
        [name, method] => (name, Some(method.as_str())),
        [] => return Err(TemplateError::new(offset, "bare '.' is not supported")),
        _ => {
            return Err(TemplateError::new(
                offset,
                format!("field path .{} is too deep", path.join(".")),
            ))
        }
    };

    let mut args = args.into_iter();
    let access = match (method, args.len()) {
        (None, 0) => Access::Value,
        (Some("Text"), 0) => Access::Text,
        (Some("Html"), 0) => Access::Html,
        (Some("Attr"), 1) => Access::Attr(Box::new(next_operand(&mut args)?)),
        (Some("AttrOr"), 2) => {
            let attr = next_operand(&mut args)?;
            let default = next_operand(&mut args)?;
            Access::AttrOr(Box::new(attr), Box::new(default))
        }
        (Some(m @ ("Text" | "Html" | "Attr" | "AttrOr")), n) => {
            return Err(TemplateError::new(
                offset,
                format!("wrong number of arguments for .{}.{}: got {}", name, m, n),
            ))
        }
        (Some(other), _) => {
            return Err(TemplateError::new(
                offset,
                format!("unknown method .{}.{}", name, other),
            ))
        }
        (None, _) => {
            return Err(TemplateError::new(
                offset,
                format!("field .{} cannot take arguments", name),
            ))
        }
    };

    Ok(FieldExpr {
        name: name.clone(),
        access,
    })
}

fn next_operand(args: &mut impl Iterator<Item = Operand>) -> Result<Operand, TemplateError> {
    args.next()
        .ok_or_else(|| TemplateError::new(0, "missing method argument"))
}

// ----------------------------------------------------------------------------
// Field references (for validation)
// ----------------------------------------------------------------------------

fn collect_nodes<'t>(nodes: &'t [Node], names: &mut Vec<&'t str>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Action(pipeline) => collect_pipeline(pipeline, names),
            Node::If {
                branches,
                otherwise,
            } => {
                for (cond, body) in branches {
                    collect_pipeline(cond, names);
                    collect_nodes(body, names);
                }
                collect_nodes(otherwise, names);
            }
        }
    }
}

fn collect_pipeline<'t>(pipeline: &'t Pipeline, names: &mut Vec<&'t str>) {
    for command in &pipeline.commands {
        match command {
            Command::Operand(op) => collect_operand(op, names),
            Command::Call(_, args) => args.iter().for_each(|op| collect_operand(op, names)),
        }
    }
}

fn collect_operand<'t>(operand: &'t Operand, names: &mut Vec<&'t str>) {
    match operand {
        Operand::Str(_) | Operand::Bool(_) => {}
        Operand::Pipeline(inner) => collect_pipeline(inner, names),
        Operand::Field(expr) => {
            if !names.contains(&expr.name.as_str()) {
                names.push(&expr.name);
            }
            match &expr.access {
                Access::Attr(attr) => collect_operand(attr, names),
                Access::AttrOr(attr, default) => {
                    collect_operand(attr, names);
                    collect_operand(default, names);
                }
                Access::Value | Access::Text | Access::Html => {}
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Evaluation
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Bool(bool),
    /// Raw text of a bare field reference; truthy when non-blank.
    Field(String),
}

impl Value {
    fn as_str(&self) -> &str {
        match self {
            Value::Str(s) | Value::Field(s) => s,
            Value::Bool(true) => "true",
            Value::Bool(false) => "false",
        }
    }

    fn into_string(self) -> String {
        match self {
            Value::Str(s) | Value::Field(s) => s,
            Value::Bool(b) => b.to_string(),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Field(s) => !s.trim().is_empty(),
            Value::Bool(b) => *b,
        }
    }
}

struct Context<'c, 'a> {
    template: &'c str,
    fields: &'c FieldMap<'a>,
}

impl Context<'_, '_> {
    fn render_nodes(&self, nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Action(pipeline) => out.push_str(self.eval_pipeline(pipeline).as_str()),
                Node::If {
                    branches,
                    otherwise,
                } => {
                    let taken = branches
                        .iter()
                        .find(|(cond, _)| self.eval_pipeline(cond).truthy())
                        .map(|(_, body)| body)
                        .unwrap_or(otherwise);
                    self.render_nodes(taken, out);
                }
            }
        }
    }

    fn eval_pipeline(&self, pipeline: &Pipeline) -> Value {
        let mut acc: Option<Value> = None;
        for command in &pipeline.commands {
            acc = Some(match command {
                Command::Operand(op) => self.eval_operand(op),
                Command::Call(func, args) => {
                    let mut values: Vec<Value> =
                        args.iter().map(|op| self.eval_operand(op)).collect();
                    if let Some(prev) = acc.take() {
                        values.push(prev);
                    }
                    apply(*func, values)
                }
            });
        }
        acc.unwrap_or_else(|| Value::Str(String::new()))
    }

    fn eval_operand(&self, operand: &Operand) -> Value {
        match operand {
            Operand::Str(s) => Value::Str(s.clone()),
            Operand::Bool(b) => Value::Bool(*b),
            Operand::Pipeline(inner) => self.eval_pipeline(inner),
            Operand::Field(expr) => self.eval_field(expr),
        }
    }

    fn eval_field(&self, expr: &FieldExpr) -> Value {
        let empty = FieldRef::default();
        let field = match self.fields.get(&expr.name) {
            Some(field) => field,
            None => {
                debug!(
                    template = self.template,
                    field = %expr.name,
                    "template references an undefined field"
                );
                &empty
            }
        };

        match &expr.access {
            Access::Value => Value::Field(field.text()),
            Access::Text => Value::Str(field.text()),
            Access::Html => Value::Str(field.html()),
            Access::Attr(attr) => {
                let attr = self.eval_operand(attr);
                Value::Str(field.attr(attr.as_str()).to_string())
            }
            Access::AttrOr(attr, default) => {
                let attr = self.eval_operand(attr);
                let default = self.eval_operand(default);
                Value::Str(field.attr_or(attr.as_str(), default.as_str()).to_string())
            }
        }
    }
}

fn apply(func: Func, mut args: Vec<Value>) -> Value {
    match func {
        Func::Trim => Value::Str(first_str(&args).trim().to_string()),
        Func::Lower => Value::Str(first_str(&args).to_lowercase()),
        Func::Upper => Value::Str(first_str(&args).to_uppercase()),
        Func::Not => Value::Bool(!args.first().is_some_and(Value::truthy)),
        Func::Eq => Value::Bool(pair(&args).is_some_and(|(a, b)| a == b)),
        Func::Ne => Value::Bool(pair(&args).is_some_and(|(a, b)| a != b)),
        Func::Contains => Value::Bool(pair(&args).is_some_and(|(a, b)| a.contains(b))),
        Func::And => {
            let idx = args
                .iter()
                .position(|v| !v.truthy())
                .unwrap_or(args.len().saturating_sub(1));
            take_at(&mut args, idx)
        }
        Func::Or => {
            let idx = args
                .iter()
                .position(Value::truthy)
                .unwrap_or(args.len().saturating_sub(1));
            take_at(&mut args, idx)
        }
        Func::Print => Value::Str(args.into_iter().map(Value::into_string).collect()),
    }
}

fn first_str(args: &[Value]) -> &str {
    args.first().map(Value::as_str).unwrap_or("")
}

fn pair(args: &[Value]) -> Option<(&str, &str)> {
    match args {
        [a, b] => Some((a.as_str(), b.as_str())),
        _ => None,
    }
}

fn take_at(args: &mut Vec<Value>, idx: usize) -> Value {
    if idx < args.len() {
        args.swap_remove(idx)
    } else {
        Value::Str(String::new())
    }
}

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{LitInt, LitStr, Token, parse_macro_input};

/// Creates a `Signal<i64>` at compile time from an ASCII waveform.
///
/// Each character is one tick of the time axis, starting at the origin
/// (0 unless given as a second argument).
///
/// # Format
///
/// - `_` is a low tick
/// - `^` or `‾` is a high tick
/// - `|` and whitespace are separators and take no time
///
/// # Examples
///
/// ```ignore
/// use binsig::waveform;
///
/// // Low for 2 ticks, high for 1, low for 1, high for 2
/// let base = waveform!("__^_^^");
///
/// // Same shape starting at -4
/// let early = waveform!("__|^|_|^^", -4);
/// ```
#[proc_macro]
pub fn waveform(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as WaveformInput);
    let pattern = input.pattern.value();

    match parse_pattern(&pattern) {
        Ok(ticks) => TokenStream::from(expand(&ticks, input.origin)),
        Err(e) => {
            let error_msg = format!("Invalid waveform '{}': {}", pattern, e);
            let expanded = quote! {
                compile_error!(#error_msg)
            };
            TokenStream::from(expanded)
        }
    }
}

struct WaveformInput {
    pattern: LitStr,
    origin: i64,
}

impl Parse for WaveformInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let pattern = input.parse()?;
        let mut origin = 0;

        if input.parse::<Option<Token![,]>>()?.is_some() && !input.is_empty() {
            let negative = input.parse::<Option<Token![-]>>()?.is_some();
            let value: i64 = input.parse::<LitInt>()?.base10_parse()?;
            origin = if negative { -value } else { value };
            input.parse::<Option<Token![,]>>()?;
        }

        Ok(Self { pattern, origin })
    }
}

fn parse_pattern(s: &str) -> Result<Vec<bool>, String> {
    let mut ticks = Vec::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '_' => ticks.push(false),
            '^' | '‾' => ticks.push(true),
            '|' => {}
            c if c.is_whitespace() => {}
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    if ticks.is_empty() {
        return Err("no ticks".to_string());
    }
    Ok(ticks)
}

/// Edge times of a tick sequence placed at `origin`.
fn edges(ticks: &[bool], origin: i64) -> Vec<i64> {
    ticks
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(index, _)| origin + index as i64 + 1)
        .collect()
}

fn expand(ticks: &[bool], origin: i64) -> TokenStream2 {
    let start = origin;
    let end = origin + ticks.len() as i64;
    let slevel = ticks[0];
    let edges = edges(ticks, origin);

    quote! {
        ::binsig::Signal::<i64>::from_parts_unchecked(
            #start,
            #end,
            ::std::vec![#(#edges),*],
            #slevel,
            ::binsig::DEFAULT_TSCALE,
        )
    }
}

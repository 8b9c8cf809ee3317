use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, quote_spanned, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    parse_quote,
    punctuated::Punctuated,
    Data,
    DeriveInput,
    Expr,
    Fields,
    Generics,
    Ident,
    Result,
    Token,
};

/// A single `name = expr` tag of the `error` attribute.
struct Tag {
    name: Ident,
    value: Expr,
}

impl Parse for Tag {
    fn parse(input: ParseStream) -> Result<Self> {
        let name = input.parse()?;
        input.parse::<Token![=]>()?;
        Ok(Tag { name, value: input.parse()? })
    }
}

/// The tags of the `error` attribute.
#[derive(Debug)]
pub struct ErrorArgs {
    pub category: Expr,
    pub message: Expr,
    pub labels: Option<Expr>,
    pub help: Option<Expr>,
}

impl Parse for ErrorArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut category = None;
        let mut message = None;
        let mut labels = None;
        let mut help = None;

        for Tag { name, value } in Punctuated::<Tag, Token![,]>::parse_terminated(input)? {
            let slot = match name.to_string().as_str() {
                "category" => &mut category,
                "message" => &mut message,
                "labels" => &mut labels,
                "help" => &mut help,
                other => return Err(syn::Error::new_spanned(&name, format!("unknown tag `{}`", other))),
            };
            if slot.replace(value).is_some() {
                return Err(syn::Error::new_spanned(&name, format!("duplicate tag `{}`", name)));
            }
        }

        let missing = |tag| syn::Error::new(input.span(), format!("missing `{}` tag in `error` attribute", tag));
        Ok(ErrorArgs {
            category: category.ok_or_else(|| missing("category"))?,
            message: message.ok_or_else(|| missing("message"))?,
            labels,
            help,
        })
    }
}

/// Brings the fields of `self` into scope by reference, so that tag expressions can use them.
fn bind_fields(fields: &Fields) -> TokenStream2 {
    match fields {
        Fields::Named(named) => {
            let names = named.named.iter().map(|field| &field.ident);
            quote! {
                #[allow(unused_variables)]
                let Self { #(#names),* } = self;
            }
        },
        Fields::Unnamed(unnamed) => quote_spanned! { unnamed.paren_token.span.join() =>
            compile_error!("`ErrorKind` cannot be derived for tuple structs");
        },
        Fields::Unit => TokenStream2::new(),
    }
}

/// The struct to derive [`ErrorKind`] for.
pub struct ErrorKindTarget {
    pub name: Ident,
    pub generics: Generics,
    pub fields: Fields,
    pub args: ErrorArgs,
}

impl Parse for ErrorKindTarget {
    fn parse(input: ParseStream) -> Result<Self> {
        let item = input.parse::<DeriveInput>()?;
        let Data::Struct(data) = item.data else {
            return Err(syn::Error::new_spanned(&item.ident, "`ErrorKind` can only be derived for structs"));
        };

        let Some(attr) = item.attrs.iter().find(|attr| attr.path().is_ident("error")) else {
            return Err(syn::Error::new(Span::call_site(), "missing `error` attribute"));
        };

        Ok(ErrorKindTarget {
            name: item.ident,
            generics: item.generics,
            fields: data.fields,
            args: attr.parse_args()?,
        })
    }
}

impl ToTokens for ErrorKindTarget {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        let Self { name, generics, fields, args } = self;

        // `as_any` needs the struct to be `'static`
        let mut generics = generics.clone();
        for param in generics.type_params_mut() {
            param.bounds.push(parse_quote!('static));
        }
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
        let bindings = bind_fields(fields);

        let ErrorArgs { category, message, labels, help } = args;
        let labels = labels
            .as_ref()
            .map_or_else(|| quote! { ([] as [&str; 0]) }, |labels| quote! { (#labels) });
        let help = help.as_ref().map(|help| quote! { report.set_help(#help); });

        tokens.extend(quote! {
            impl #impl_generics sym_error::ErrorKind for #name #ty_generics #where_clause {
                fn category(&self) -> sym_error::Category {
                    #bindings
                    #category
                }

                fn as_any(&self) -> &dyn std::any::Any {
                    self
                }

                fn build_report<'a>(
                    &self,
                    src_id: &'a str,
                    spans: &[std::ops::Range<usize>],
                ) -> ariadne::Report<(&'a str, std::ops::Range<usize>)> {
                    #bindings

                    // an error with no spans is reported at the start of the source
                    let offset = spans.first().map_or(0, |span| span.start);
                    let labels = #labels
                        .into_iter()
                        .zip(spans)
                        .map(|(text, span)| {
                            let text = text.to_string();
                            let label = ariadne::Label::new((src_id, span.clone()))
                                .with_color(sym_error::EXPR);
                            if text.is_empty() {
                                label
                            } else {
                                label.with_message(text)
                            }
                        });

                    #[allow(unused_mut)]
                    let mut report = ariadne::Report::build(ariadne::ReportKind::Error, src_id, offset)
                        .with_message(#message)
                        .with_labels(labels);
                    #help
                    report.finish()
                }
            }
        });
    }
}

use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{Data, DeriveInput, Type, parse_macro_input};

/// Macro that will generate Connection and Edge structs for you to use when returning lists.
///
/// Nodes that are `graphql_object`s with a context need that context on the generated types too:
///
/// ```nocompile
/// #[derive(Clone, Debug, RelayConnection)]
/// #[relay(context = Context)]
/// pub struct Department { ... }
/// ```
#[proc_macro_derive(RelayConnection, attributes(relay))]
pub fn macro_relay_connection_node(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let context = match relay_context(&input) {
        Ok(context) => context,
        Err(err) => return err.to_compile_error().into(),
    };
    let context_attr = context.map(|context| quote! { context = #context, });

    let out = match input.data {
        Data::Struct(_s) => {
            let connection_gql_name = format!("{}Connection", input.ident);
            let connection_gql_desc = format!("Connection type for {}.", input.ident);
            let edge_gql_name = format!("{}Edge", input.ident);
            let edge_gql_desc = format!("Edge type for {}.", input.ident);
            let connection_name = Ident::new(
                &format!("{}RelayConnection", input.ident),
                Span::mixed_site(),
            );
            let edge_name = Ident::new(&format!("{}RelayEdge", input.ident), Span::mixed_site());
            let struct_name = input.ident;

            quote! {
                #[derive(juniper::GraphQLObject, Debug, Clone)]
                #[graphql(
                    #context_attr
                    name = #connection_gql_name,
                    description = #connection_gql_desc
                )]
                pub struct #connection_name {
                    /// Number of rows matching the query, across all pages.
                    pub total_count: i32,
                    pub edges: Vec<#edge_name>,
                    pub page_info: juniper_relay_loaders::PageInfo,
                }

                impl juniper_relay_loaders::RelayConnection for #connection_name {
                    type EdgeType = #edge_name;
                    type NodeType = #struct_name;

                    fn from_page(page: juniper_relay_loaders::Page<#struct_name>) -> Self {
                        Self {
                            total_count: i32::try_from(page.total_count).unwrap_or(i32::MAX),
                            edges: page.edges.into_iter().map(|edge| {
                                <#edge_name as juniper_relay_loaders::RelayEdge>::new(
                                    edge.node,
                                    edge.cursor,
                                )
                            }).collect(),
                            page_info: page.page_info,
                        }
                    }
                }

                #[derive(juniper::GraphQLObject, Debug, Clone)]
                #[graphql(
                    #context_attr
                    name = #edge_gql_name,
                    description = #edge_gql_desc
                )]
                pub struct #edge_name {
                    pub node: #struct_name,
                    pub cursor: String,
                }

                impl juniper_relay_loaders::RelayEdge for #edge_name {
                    type NodeType = #struct_name;
                    fn new(node: Self::NodeType, cursor: String) -> Self {
                        Self { node, cursor }
                    }
                }
            }
        }
        _ => quote! {},
    };

    out.into()
}

/// Reads `#[relay(context = Type)]`, if present.
fn relay_context(input: &DeriveInput) -> syn::Result<Option<Type>> {
    let mut context = None;
    for attr in input.attrs.iter().filter(|attr| attr.path().is_ident("relay")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("context") {
                context = Some(meta.value()?.parse::<Type>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported relay attribute, expected `context`"))
            }
        })?;
    }
    Ok(context)
}

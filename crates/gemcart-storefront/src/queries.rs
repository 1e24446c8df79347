//! GraphQL documents sent to the Storefront API.
//!
//! Every cart operation selects the same `CartFields` fragment so that any
//! response can replace the client's snapshot wholesale.

const CART_FRAGMENT: &str = r"
fragment MoneyFields on MoneyV2 { amount currencyCode }
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  note
  buyerIdentity { countryCode email phone }
  discountCodes { code applicable }
  appliedGiftCards { id lastCharacters amountUsed { ...MoneyFields } }
  cost {
    subtotalAmount { ...MoneyFields }
    totalAmount { ...MoneyFields }
    totalTaxAmount { ...MoneyFields }
  }
  lines(first: 100) {
    nodes {
      id
      quantity
      cost {
        amountPerQuantity { ...MoneyFields }
        totalAmount { ...MoneyFields }
        compareAtAmountPerQuantity { ...MoneyFields }
      }
      merchandise {
        ... on ProductVariant {
          id
          title
          price { ...MoneyFields }
          image { url altText }
          selectedOptions { name value }
          product { handle title }
        }
      }
    }
  }
}
";

const PAYLOAD_FIELDS: &str =
    "cart { ...CartFields } userErrors { code field message } warnings { code message target }";

/// A GraphQL operation: its document and the root field holding its payload.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operation {
    pub root_field: &'static str,
    pub signature: &'static str,
    pub arguments: &'static str,
}

impl Operation {
    /// Full document text including the cart fragment.
    pub(crate) fn document(self) -> String {
        format!(
            "mutation {}{{ {}({}) {{ {PAYLOAD_FIELDS} }} }}\n{CART_FRAGMENT}",
            self.signature, self.root_field, self.arguments
        )
    }
}

pub(crate) const CART_CREATE: Operation = Operation {
    root_field: "cartCreate",
    signature: "CartCreate($input: CartInput!) ",
    arguments: "input: $input",
};

pub(crate) const CART_LINES_ADD: Operation = Operation {
    root_field: "cartLinesAdd",
    signature: "CartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) ",
    arguments: "cartId: $cartId, lines: $lines",
};

pub(crate) const CART_LINES_UPDATE: Operation = Operation {
    root_field: "cartLinesUpdate",
    signature: "CartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) ",
    arguments: "cartId: $cartId, lines: $lines",
};

pub(crate) const CART_LINES_REMOVE: Operation = Operation {
    root_field: "cartLinesRemove",
    signature: "CartLinesRemove($cartId: ID!, $lineIds: [ID!]!) ",
    arguments: "cartId: $cartId, lineIds: $lineIds",
};

pub(crate) const CART_NOTE_UPDATE: Operation = Operation {
    root_field: "cartNoteUpdate",
    signature: "CartNoteUpdate($cartId: ID!, $note: String!) ",
    arguments: "cartId: $cartId, note: $note",
};

pub(crate) const CART_DISCOUNT_CODES_UPDATE: Operation = Operation {
    root_field: "cartDiscountCodesUpdate",
    signature: "CartDiscountCodesUpdate($cartId: ID!, $discountCodes: [String!]) ",
    arguments: "cartId: $cartId, discountCodes: $discountCodes",
};

pub(crate) const CART_GIFT_CARD_CODES_UPDATE: Operation = Operation {
    root_field: "cartGiftCardCodesUpdate",
    signature: "CartGiftCardCodesUpdate($cartId: ID!, $giftCardCodes: [String!]!) ",
    arguments: "cartId: $cartId, giftCardCodes: $giftCardCodes",
};

pub(crate) const CART_BUYER_IDENTITY_UPDATE: Operation = Operation {
    root_field: "cartBuyerIdentityUpdate",
    signature: "CartBuyerIdentityUpdate($cartId: ID!, $buyerIdentity: CartBuyerIdentityInput!) ",
    arguments: "cartId: $cartId, buyerIdentity: $buyerIdentity",
};

/// Root field of the cart read query.
pub(crate) const CART_ROOT_FIELD: &str = "cart";

pub(crate) fn cart_query() -> String {
    format!("query Cart($cartId: ID!) {{ cart(id: $cartId) {{ ...CartFields }} }}\n{CART_FRAGMENT}")
}

/// Root field of the collection products query.
pub(crate) const COLLECTION_ROOT_FIELD: &str = "collection";

pub(crate) const COLLECTION_PRODUCTS_QUERY: &str = r"
query CollectionProducts($handle: String!, $first: Int!, $after: String) {
  collection(handle: $handle) {
    products(first: $first, after: $after) {
      pageInfo { hasNextPage endCursor }
      nodes {
        id
        handle
        title
        descriptionHtml
        tags
        availableForSale
        featuredImage { url altText }
        priceRange { minVariantPrice { amount currencyCode } }
      }
    }
  }
}
";
